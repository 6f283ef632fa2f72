//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shell_requests_total` (counter): requests by method, route, status
//! - `shell_request_duration_seconds` (histogram): handler latency
//! - `shell_engine_start_total` (counter): engine start attempts by outcome

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::Label;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("route", route.to_string()),
        Label::new("status", status.to_string()),
    ];
    ::metrics::counter!("shell_requests_total", labels.clone()).increment(1);
    ::metrics::histogram!("shell_request_duration_seconds", labels)
        .record(start.elapsed().as_secs_f64());
}

/// `outcome` is either `succeeded` or `failed`.
pub fn record_engine_start(outcome: &'static str) {
    ::metrics::counter!("shell_engine_start_total", "outcome" => outcome).increment(1);
}
