//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (request_id, path, source) on every event
//! - Metrics are cheap; recording without an installed exporter is a no-op
//! - The exporter is off by default

pub mod logging;
pub mod metrics;
