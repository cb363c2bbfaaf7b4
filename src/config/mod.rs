//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → ConfigOverrides (command-line flags)
//!     → validation.rs (semantic checks)
//!     → InspectorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ConfigOverrides, InspectorConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    TimeoutConfig, TlsConfig,
};
pub use validation::ValidationError;
