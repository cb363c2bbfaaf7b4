//! Request inspector library.
//!
//! Answers every HTTP(S) request with a report of what the server observed:
//! headers, method, request-target, peer address, protocol and negotiated
//! TLS parameters.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod report;

pub use config::InspectorConfig;
pub use error::InspectorError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use report::{parse_json_section, Report};
