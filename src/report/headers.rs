//! Flattened header snapshot.
//!
//! # Responsibilities
//! - Render every header name once, in canonical MIME form
//! - Join repeated values with `, `
//! - Guarantee a `Host` entry
//!
//! # Design Decisions
//! - Backed by a `BTreeMap` so text and JSON output share one ordering
//! - Non UTF-8 bytes are replaced, never dropped

use std::collections::btree_map;
use std::collections::BTreeMap;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Delimiter used when a header carries several values.
pub const VALUE_DELIMITER: &str = ", ";

const HOST: &str = "Host";

/// Single-valued copy of the request headers, keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSnapshot(BTreeMap<String, String>);

impl HeaderSnapshot {
    /// Build a snapshot from the parsed header map.
    ///
    /// `host` is the connection's host field and only fills in `Host` when
    /// the request carried no such header.
    pub fn capture(headers: &HeaderMap, host: &str) -> Self {
        let mut entries = BTreeMap::new();

        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(VALUE_DELIMITER);
            entries.insert(canonical_header_name(name.as_str()), joined);
        }

        entries
            .entry(HOST.to_string())
            .or_insert_with(|| host.to_string());

        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

/// Canonical MIME form of a header name: `x-forwarded-for` → `X-Forwarded-For`.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}
