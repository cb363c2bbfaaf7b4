//! Non-header request metadata.

use std::collections::btree_map;
use std::collections::BTreeMap;

use axum::http::Version;
use serde::{Deserialize, Serialize};

use super::tls_names::{cipher_suite_name, version_name};

pub const METHOD: &str = "Method";
pub const REQUEST_URI: &str = "RequestURI";
pub const REMOTE_ADDR: &str = "RemoteAddr";
pub const PROTOCOL: &str = "Protocol";
pub const TLS_VERSION: &str = "TLS-Version";
pub const TLS_CIPHER_SUITE: &str = "TLS-CipherSuite";
pub const TLS_SERVER_NAME: &str = "TLS-ServerName";

/// Parameters negotiated during the TLS handshake of the connection a
/// request arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSession {
    /// Protocol version code (e.g. `0x0304` for TLS 1.3).
    pub version: u16,
    /// IANA cipher suite code.
    pub cipher_suite: u16,
    /// SNI host name sent by the client, empty when none was sent.
    pub server_name: String,
}

/// Fixed-schema request summary. The `TLS-*` fields are present only for
/// encrypted connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestInfo(BTreeMap<String, String>);

impl RequestInfo {
    pub fn new(
        method: &str,
        request_uri: &str,
        remote_addr: &str,
        protocol: &str,
        tls: Option<&TlsSession>,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(METHOD.to_string(), method.to_string());
        fields.insert(REQUEST_URI.to_string(), request_uri.to_string());
        fields.insert(REMOTE_ADDR.to_string(), remote_addr.to_string());
        fields.insert(PROTOCOL.to_string(), protocol.to_string());

        if let Some(session) = tls {
            fields.insert(TLS_VERSION.to_string(), version_name(session.version));
            fields.insert(
                TLS_CIPHER_SUITE.to_string(),
                cipher_suite_name(session.cipher_suite),
            );
            fields.insert(TLS_SERVER_NAME.to_string(), session.server_name.clone());
        }

        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the request arrived over TLS.
    pub fn is_encrypted(&self) -> bool {
        self.0.contains_key(TLS_VERSION)
    }

    /// Fields in ascending name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

/// Protocol label as it appears in the `Protocol` field.
pub fn protocol_label(version: Version) -> String {
    match version {
        Version::HTTP_09 => "HTTP/0.9".to_string(),
        Version::HTTP_10 => "HTTP/1.0".to_string(),
        Version::HTTP_11 => "HTTP/1.1".to_string(),
        Version::HTTP_2 => "HTTP/2.0".to_string(),
        Version::HTTP_3 => "HTTP/3.0".to_string(),
        other => format!("{:?}", other),
    }
}
