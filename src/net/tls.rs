//! TLS configuration, certificate loading and session capture.

use std::io;

use axum::middleware::AddExtension;
use axum::Extension;
use axum_server::accept::{Accept, DefaultAcceptor};
use axum_server::tls_rustls::{RustlsAcceptor, RustlsConfig};
use futures_util::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::rustls::ServerConnection;
use tokio_rustls::server::TlsStream;
use tower::Layer;

use crate::config::TlsConfig;
use crate::report::TlsSession;

/// Load the listener's certificate chain and private key.
///
/// Errors keep their `io::ErrorKind` and name the file that failed.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, io::Error> {
    for (role, path) in [("certificate", &tls.cert_path), ("private key", &tls.key_path)] {
        if let Err(e) = tokio::fs::metadata(path).await {
            return Err(io::Error::new(e.kind(), format!("{} {}: {}", role, path, e)));
        }
    }

    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("{} / {}: {}", tls.cert_path, tls.key_path, e),
            )
        })
}

/// Negotiated parameters of a completed server-side handshake.
pub fn session_from_connection(conn: &ServerConnection) -> TlsSession {
    TlsSession {
        version: conn.protocol_version().map(u16::from).unwrap_or(0),
        cipher_suite: conn
            .negotiated_cipher_suite()
            .map(|suite| u16::from(suite.suite()))
            .unwrap_or(0),
        server_name: conn.server_name().unwrap_or_default().to_string(),
    }
}

/// Rustls acceptor that attaches the connection's [`TlsSession`] to every
/// request served on it.
#[derive(Debug, Clone)]
pub struct TlsSessionAcceptor {
    inner: RustlsAcceptor<DefaultAcceptor>,
}

impl TlsSessionAcceptor {
    pub fn new(config: RustlsConfig) -> Self {
        Self {
            inner: RustlsAcceptor::new(config),
        }
    }
}

impl<I, S> Accept<I, S> for TlsSessionAcceptor
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: Send + 'static,
{
    type Stream = TlsStream<I>;
    type Service = AddExtension<S, TlsSession>;
    type Future = BoxFuture<'static, io::Result<(Self::Stream, Self::Service)>>;

    fn accept(&self, stream: I, service: S) -> Self::Future {
        let acceptor = self.inner.clone();

        Box::pin(async move {
            let (stream, service) = acceptor.accept(stream, service).await?;
            let session = session_from_connection(stream.get_ref().1);

            tracing::trace!(
                version = session.version,
                cipher_suite = session.cipher_suite,
                server_name = %session.server_name,
                "TLS handshake complete"
            );

            Ok((stream, Extension(session).layer(service)))
        })
    }
}
