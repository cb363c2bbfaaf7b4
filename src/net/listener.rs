//! Listener binding.
//!
//! Both serving modes bind through here, so a busy port or a bad address
//! is always reported as [`InspectorError::Bind`].

use std::net::TcpListener;

use crate::error::InspectorError;

/// Bind a listening socket on `address`.
pub fn bind_listener(address: &str) -> Result<TcpListener, InspectorError> {
    let listener = TcpListener::bind(address).map_err(|source| InspectorError::Bind {
        address: address.to_string(),
        source,
    })?;

    tracing::info!(
        address = %listener.local_addr().map_err(|source| InspectorError::Bind {
            address: address.to_string(),
            source,
        })?,
        "Listener bound"
    );
    Ok(listener)
}

/// Bind for the plaintext server, which runs on a Tokio listener.
pub fn bind_tokio_listener(address: &str) -> Result<tokio::net::TcpListener, InspectorError> {
    let listener = bind_listener(address)?;
    listener
        .set_nonblocking(true)
        .and_then(|()| tokio::net::TcpListener::from_std(listener))
        .map_err(|source| InspectorError::Bind {
            address: address.to_string(),
            source,
        })
}
