//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use request_inspector::config::{InspectorConfig, TlsConfig};
use request_inspector::net::listener::bind_listener;
use request_inspector::net::tls::load_tls_config;
use request_inspector::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A plaintext inspector running on an ephemeral local port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub scheme: &'static str,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        match self.scheme {
            "https" => format!("https://localhost:{}{}", self.addr.port(), path),
            _ => format!("http://{}{}", self.addr, path),
        }
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
            .expect("server returned an error");
    }
}

pub async fn start_server() -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = InspectorConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    RunningServer {
        addr,
        scheme: "http",
        shutdown,
        handle,
    }
}

/// A TLS inspector on an ephemeral port, serving a fresh self-signed
/// certificate for `localhost`.
#[allow(dead_code)]
pub async fn start_tls_server() -> RunningServer {
    let listener = bind_listener("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let dir = std::env::temp_dir();
    let cert_path = dir.join(format!("request-inspector-{}-cert.pem", addr.port()));
    let key_path = dir.join(format!("request-inspector-{}-key.pem", addr.port()));
    std::fs::write(&cert_path, certified.cert.pem()).unwrap();
    std::fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();

    let tls = TlsConfig {
        cert_path: cert_path.to_string_lossy().into_owned(),
        key_path: key_path.to_string_lossy().into_owned(),
    };
    let rustls = load_tls_config(&tls).await.unwrap();

    let mut config = InspectorConfig::default();
    config.listener.bind_address = addr.to_string();
    config.listener.tls = Some(tls);
    config.timeouts.shutdown_grace_secs = 1;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let handle = tokio::spawn(server.run_tls(listener, rustls, shutdown.subscribe()));

    RunningServer {
        addr,
        scheme: "https",
        shutdown,
        handle,
    }
}

/// Client that trusts self-signed certificates and resolves `localhost`
/// to the test server.
#[allow(dead_code)]
pub fn tls_client(addr: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .resolve("localhost", addr)
        .build()
        .unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
