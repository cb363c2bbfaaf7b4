//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, catch-all route, middleware)
//!     → request.rs (connection facts, request-target, host)
//!     → report module (render)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::RequestFacts;
pub use server::HttpServer;
