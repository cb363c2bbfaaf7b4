//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`, initialised once in `main`
//! - Per-request spans come from tower-http's `TraceLayer`
//! - No metrics: each request is reported and forgotten

pub mod logging;
