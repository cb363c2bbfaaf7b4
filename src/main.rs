//! Request Inspector
//!
//! A diagnostic HTTP(S) endpoint that answers every request with a report of
//! what actually arrived: headers, method, request-target, peer address,
//! protocol version and negotiated TLS parameters.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net (TLS handshake, session capture)
//!                      │
//!                      ▼
//!                     http (router, catch-all handler)
//!                      │
//!                      ▼
//!                     report (headers + info → text and JSON)
//!                      │
//!     ◀────────────────┘
//!
//!     config · observability · lifecycle (cross-cutting)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use request_inspector::config::{load_config, ConfigOverrides, InspectorConfig, LogFormat, TlsConfig};
use request_inspector::lifecycle::signals::spawn_signal_listener;
use request_inspector::net::listener::{bind_listener, bind_tokio_listener};
use request_inspector::net::tls::load_tls_config;
use request_inspector::observability::logging::init_logging;
use request_inspector::{HttpServer, InspectorError, Shutdown};

#[derive(Parser)]
#[command(name = "request-inspector", version)]
#[command(about = "Echo back what the server observed about each HTTP(S) request", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0:9090
    #[arg(short, long)]
    bind: Option<String>,

    /// PEM certificate; enables TLS together with --tls-key
    #[arg(long, requires = "tls_key")]
    tls_cert: Option<String>,

    /// PEM private key; enables TLS together with --tls-cert
    #[arg(long, requires = "tls_cert")]
    tls_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };

        ConfigOverrides {
            bind_address: self.bind.clone(),
            tls,
            log_level: self.log_level.clone(),
            log_format: self.log_format.map(|format| match format {
                LogFormatArg::Pretty => LogFormat::Pretty,
                LogFormatArg::Json => LogFormat::Json,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref(), args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("request-inspector: {}", InspectorError::from(e));
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: InspectorConfig) -> Result<(), InspectorError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "request-inspector starting"
    );

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(Arc::clone(&shutdown));

    let address = config.listener.bind_address.clone();
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config);

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await.map_err(InspectorError::Tls)?;
            let listener = bind_listener(&address)?;

            server
                .run_tls(listener, rustls, shutdown.subscribe())
                .await
                .map_err(InspectorError::Serve)
        }
        None => {
            let listener = bind_tokio_listener(&address)?;

            server
                .run(listener, shutdown.subscribe())
                .await
                .map_err(InspectorError::Serve)
        }
    }
}
