//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sizes > 0)
//! - Validate socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.storage.path.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "storage.path",
        });
    }
    if config.storage.map_size_mb == 0 {
        errors.push(ValidationError::Zero {
            field: "storage.map_size_mb",
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero {
            field: "security.max_body_size",
        });
    }

    if matches!(config.admin.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        errors.push(ValidationError::Empty {
            field: "admin.api_key",
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
