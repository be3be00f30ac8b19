//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → command-line overrides (main.rs)
//!     → ServiceConfig (validated, immutable)
//!     → shared with the HTTP server and store
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, ListenerConfig, ObservabilityConfig, SecurityConfig, ServiceConfig,
    StorageConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
