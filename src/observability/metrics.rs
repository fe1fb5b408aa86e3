//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by terminal outcome
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_rate_limited_total` (counter): over-quota rejections
//! - `gateway_provider_errors_total` (counter): failed provider calls

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request with its terminal outcome.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("gateway_requests_total", "outcome" => outcome).increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an over-quota rejection.
pub fn record_rate_limited() {
    counter!("gateway_rate_limited_total").increment(1);
}

/// Record a failed provider call.
pub fn record_provider_error(provider: &'static str) {
    counter!("gateway_provider_errors_total", "provider" => provider).increment(1);
}
