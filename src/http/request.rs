//! Request adaptation for the reporter.
//!
//! # Responsibilities
//! - Extract the request-target the way the client sent it
//! - Resolve the connection host used for `Host` synthesis
//! - Collect connection facts (peer address, TLS session)
//!
//! # Design Decisions
//! - Owned strings live here; the reporter only borrows them
//! - TLS facts arrive as a request extension set by the acceptor

use std::net::SocketAddr;

use axum::http::request::Parts;
use axum::http::Version;

use crate::report::info::protocol_label;
use crate::report::{ObservedRequest, Report, TlsSession};

/// Owned facts about one request, borrowed by [`ObservedRequest`].
#[derive(Debug)]
pub struct RequestFacts<'a> {
    parts: &'a Parts,
    host: String,
    method: String,
    request_uri: String,
    remote_addr: String,
    protocol: String,
}

impl<'a> RequestFacts<'a> {
    pub fn from_parts(parts: &'a Parts, remote_addr: SocketAddr) -> Self {
        Self {
            parts,
            host: connection_host(parts),
            method: parts.method.to_string(),
            request_uri: request_target(parts),
            remote_addr: remote_addr.to_string(),
            protocol: protocol_label(parts.version),
        }
    }

    pub fn tls(&self) -> Option<&'a TlsSession> {
        self.parts.extensions.get::<TlsSession>()
    }

    pub fn observed(&self) -> ObservedRequest<'_> {
        ObservedRequest {
            headers: &self.parts.headers,
            host: &self.host,
            method: &self.method,
            request_uri: &self.request_uri,
            remote_addr: &self.remote_addr,
            protocol: &self.protocol,
            tls: self.tls(),
        }
    }

    pub fn report(&self) -> Report {
        Report::observe(&self.observed())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }
}

/// The request-target as the client sent it.
///
/// HTTP/2 and later carry `:path` separately from `:authority`, so only the
/// path and query are reported there. HTTP/1 targets are kept verbatim,
/// including absolute-form.
pub fn request_target(parts: &Parts) -> String {
    match parts.version {
        Version::HTTP_2 | Version::HTTP_3 => parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.to_string()),
        _ => parts.uri.to_string(),
    }
}

/// Host known from the connection itself rather than the `Host` header.
pub fn connection_host(parts: &Parts) -> String {
    parts
        .uri
        .authority()
        .map(|authority| authority.as_str().to_string())
        .unwrap_or_default()
}
