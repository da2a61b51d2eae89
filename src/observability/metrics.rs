//! Metrics collection and exposition.
//!
//! # Metrics
//! - `comment_requests_total` (counter): requests by method, status
//! - `comment_request_duration_seconds` (histogram): latency by method

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`. Failures are logged; the
/// service keeps running without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "comment_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("comment_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
