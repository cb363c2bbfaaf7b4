//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.rs (bind; failures are InspectorError::Bind)
//!     → Incoming TCP connection
//!     → [plaintext] straight to the HTTP layer
//!     → [TLS] tls.rs handshake, session parameters captured
//!         → attached to each request as a TlsSession extension
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently
//! - Session facts travel with the request, never through shared state

pub mod listener;
pub mod tls;
