//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Honor `RUST_LOG` when set, otherwise the configured level
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - One initialization per process; later calls are ignored

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives for a given level.
pub fn default_directives(level: &str) -> String {
    format!("shortlinks={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
