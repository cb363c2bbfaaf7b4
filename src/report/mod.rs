//! Request introspection and report rendering.
//!
//! # Data Flow
//! ```text
//! HTTP layer (parsed request + connection facts)
//!     → ObservedRequest (borrowed view, transport-free)
//!     → headers.rs (HeaderSnapshot)
//!     → info.rs (RequestInfo, TLS names via tls_names.rs)
//!     → Report::write_to (three sections, fixed order)
//! ```
//!
//! # Design Decisions
//! - Pure function of one request: no shared state, no I/O
//! - Both maps are ordered, so text and JSON output are deterministic
//! - The JSON section is a single line and can be parsed back

pub mod headers;
pub mod info;
pub mod tls_names;

use std::fmt::{self, Write};

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub use headers::HeaderSnapshot;
pub use info::{RequestInfo, TlsSession};

const HEADERS_BANNER: &str = "Headers received:\n==================\n";
const INFO_BANNER: &str = "\nOther request information:\n===========================\n";
const JSON_BANNER: &str = "\nComplete data in JSON format:\n==============================\n";

/// Everything the reporter needs to know about one inbound request.
#[derive(Debug, Clone, Copy)]
pub struct ObservedRequest<'a> {
    pub headers: &'a HeaderMap,
    /// Host from the connection/URI, used only when no `Host` header exists.
    pub host: &'a str,
    pub method: &'a str,
    pub request_uri: &'a str,
    pub remote_addr: &'a str,
    pub protocol: &'a str,
    pub tls: Option<&'a TlsSession>,
}

/// Report on a single request: flattened headers plus request metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub headers: HeaderSnapshot,
    pub info: RequestInfo,
}

impl Report {
    pub fn observe(request: &ObservedRequest<'_>) -> Self {
        Self {
            headers: HeaderSnapshot::capture(request.headers, request.host),
            info: RequestInfo::new(
                request.method,
                request.request_uri,
                request.remote_addr,
                request.protocol,
                request.tls,
            ),
        }
    }

    /// Write the three report sections to `out`, in order.
    ///
    /// Output already written stays written if a later step fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(HEADERS_BANNER)?;
        write_sorted(out, self.headers.iter())?;

        out.write_str(INFO_BANNER)?;
        write_sorted(out, self.info.iter())?;

        out.write_str(JSON_BANNER)?;
        let json = serde_json::to_string(self).map_err(|e| {
            tracing::warn!(error = %e, "Failed to encode report as JSON");
            fmt::Error
        })?;
        out.write_str(&json)?;
        out.write_char('\n')
    }

    /// Render the full response body.
    pub fn render(&self) -> String {
        let mut body = String::new();
        // Errors only truncate the body.
        let _ = self.write_to(&mut body);
        body
    }
}

fn write_sorted<'a, W: Write>(
    out: &mut W,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> fmt::Result {
    for (key, value) in entries {
        writeln!(out, "{}: {}", key, value)?;
    }
    Ok(())
}

/// Error returned when a response body does not contain a usable JSON section.
#[derive(Debug, thiserror::Error)]
pub enum ReportParseError {
    #[error("response does not contain the JSON section banner")]
    MissingJsonBanner,
    #[error("JSON section is empty")]
    MissingJsonLine,
    #[error("invalid JSON section: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the JSON section of a rendered report body.
pub fn parse_json_section(body: &str) -> Result<Report, ReportParseError> {
    let (_, rest) = body
        .split_once(JSON_BANNER)
        .ok_or(ReportParseError::MissingJsonBanner)?;
    let line = rest
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(ReportParseError::MissingJsonLine)?;
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tls_names::{TLS_1_2, TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384};
    use axum::http::HeaderValue;
    use std::collections::BTreeMap;

    fn sample_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.4.0"));
        headers.append("x-foo", HeaderValue::from_static("a"));
        headers.append("x-foo", HeaderValue::from_static("b"));
        headers.insert("accept", HeaderValue::from_static("*/*"));
        headers
    }

    /// Parse the `key: value` lines that follow `banner` up to the next blank line.
    fn text_section(body: &str, banner: &str) -> Vec<(String, String)> {
        let (_, rest) = body.split_once(banner).unwrap();
        rest.lines()
            .take_while(|line| !line.is_empty())
            .map(|line| {
                let (k, v) = line.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn banners_have_expected_rules() {
        assert_eq!(HEADERS_BANNER.lines().nth(1).unwrap().len(), 18);
        assert_eq!(INFO_BANNER.lines().nth(2).unwrap().len(), 27);
        assert_eq!(JSON_BANNER.lines().nth(2).unwrap().len(), 30);
    }

    #[test]
    fn end_to_end_plaintext_get() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("text/html"));
        let request = ObservedRequest {
            headers: &headers,
            host: "",
            method: "GET",
            request_uri: "/test?x=1",
            remote_addr: "10.0.0.5:4444",
            protocol: "HTTP/1.1",
            tls: None,
        };

        let body = Report::observe(&request).render();
        let expected = "Headers received:\n\
                        ==================\n\
                        Accept: text/html\n\
                        Host: \n\
                        \n\
                        Other request information:\n\
                        ===========================\n\
                        Method: GET\n\
                        Protocol: HTTP/1.1\n\
                        RemoteAddr: 10.0.0.5:4444\n\
                        RequestURI: /test?x=1\n\
                        \n\
                        Complete data in JSON format:\n\
                        ==============================\n\
                        {\"headers\":{\"Accept\":\"text/html\",\"Host\":\"\"},\
                        \"info\":{\"Method\":\"GET\",\"Protocol\":\"HTTP/1.1\",\
                        \"RemoteAddr\":\"10.0.0.5:4444\",\"RequestURI\":\"/test?x=1\"}}\n";
        assert_eq!(body, expected);
        assert!(!body.contains("TLS-"));
    }

    #[test]
    fn output_is_deterministic() {
        let headers = sample_headers();
        let request = ObservedRequest {
            headers: &headers,
            host: "example.com",
            method: "POST",
            request_uri: "/upload",
            remote_addr: "[::1]:5000",
            protocol: "HTTP/2.0",
            tls: None,
        };

        let first = Report::observe(&request).render();
        let second = Report::observe(&request).render();
        assert_eq!(first, second);

        for banner in [HEADERS_BANNER, INFO_BANNER] {
            let keys: Vec<_> = text_section(&first, banner)
                .into_iter()
                .map(|(k, _)| k)
                .collect();
            assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", keys);
        }
    }

    #[test]
    fn json_section_matches_text_sections() {
        let headers = sample_headers();
        let session = TlsSession {
            version: TLS_1_2,
            cipher_suite: TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
            server_name: "secure.example.com".to_string(),
        };
        let request = ObservedRequest {
            headers: &headers,
            host: "secure.example.com",
            method: "GET",
            request_uri: "/",
            remote_addr: "192.168.1.20:51000",
            protocol: "HTTP/1.1",
            tls: Some(&session),
        };

        let report = Report::observe(&request);
        let body = report.render();
        let decoded = parse_json_section(&body).unwrap();
        assert_eq!(decoded, report);

        let text_headers: BTreeMap<_, _> = text_section(&body, HEADERS_BANNER).into_iter().collect();
        let text_info: BTreeMap<_, _> = text_section(&body, INFO_BANNER).into_iter().collect();
        let json_headers: BTreeMap<_, _> = decoded
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let json_info: BTreeMap<_, _> = decoded
            .info
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(text_headers, json_headers);
        assert_eq!(text_info, json_info);

        assert_eq!(text_headers["X-Foo"], "a, b");
        assert_eq!(text_info["TLS-Version"], "TLS 1.2");
        assert_eq!(
            text_info["TLS-CipherSuite"],
            "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
        );
        assert_eq!(text_info["TLS-ServerName"], "secure.example.com");
    }

    #[test]
    fn json_is_single_line_with_top_level_keys() {
        let headers = sample_headers();
        let request = ObservedRequest {
            headers: &headers,
            host: "h",
            method: "GET",
            request_uri: "/",
            remote_addr: "127.0.0.1:1",
            protocol: "HTTP/1.1",
            tls: None,
        };
        let body = Report::observe(&request).render();
        let line = body.lines().last().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["headers"].is_object());
        assert!(object["info"].is_object());
        assert!(body.ends_with("}\n"));
    }

    #[test]
    fn parse_rejects_bodies_without_json() {
        assert!(matches!(
            parse_json_section("hello"),
            Err(ReportParseError::MissingJsonBanner)
        ));
        let truncated = format!("{}{}", HEADERS_BANNER, JSON_BANNER);
        assert!(matches!(
            parse_json_section(&truncated),
            Err(ReportParseError::MissingJsonLine)
        ));
        let garbage = format!("{}{{not json\n", JSON_BANNER);
        assert!(matches!(
            parse_json_section(&garbage),
            Err(ReportParseError::Json(_))
        ));
    }
}
