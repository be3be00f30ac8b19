//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shortlinks_resolutions_total` (counter): resolutions by outcome
//!   (`exact`, `wildcard`, `not_found`, `error`)
//! - `shortlinks_resolution_duration_seconds` (histogram): lookup latency
//! - `shortlinks_registry_writes_total` (counter): admin writes by op
//! - `shortlinks_http_responses_total` (counter): responses by handler, status

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(outcome: &'static str, start: Instant) {
    metrics::counter!("shortlinks_resolutions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("shortlinks_resolution_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_registry_write(op: &'static str) {
    metrics::counter!("shortlinks_registry_writes_total", "op" => op).increment(1);
}

pub fn record_response(handler: &'static str, status: u16) {
    metrics::counter!(
        "shortlinks_http_responses_total",
        "handler" => handler,
        "status" => status.to_string()
    )
    .increment(1);
}
