//! Errors surfaced by the server binary.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load TLS certificate: {0}")]
    Tls(#[source] std::io::Error),
    #[error("failed to listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
