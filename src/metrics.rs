//! Prometheus metrics for request handling.
//!
//! This module provides metrics for:
//! - Requests handled, by operation and status
//! - Request latency
//! - Store call latency
//! - Notification publish failures

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::handler::request::Operation;

// === Metric Name Constants ===

/// Requests handled counter metric name.
pub const METRIC_REQUESTS: &str = "mapping_requests_total";
/// Request latency metric name.
pub const METRIC_REQUEST_LATENCY: &str = "mapping_request_latency_ms";
/// Store put latency metric name.
pub const METRIC_STORE_PUT_LATENCY: &str = "store_put_latency_ms";
/// Store query latency metric name.
pub const METRIC_STORE_QUERY_LATENCY: &str = "store_query_latency_ms";
/// Notification failures counter metric name.
pub const METRIC_NOTIFY_FAILURES: &str = "notify_failures_total";

/// Install the Prometheus recorder and describe all metrics.
/// Call this once at startup; the handle renders `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| e.to_string())?;

    describe_counter!(METRIC_REQUESTS, "Total number of requests handled");
    describe_histogram!(
        METRIC_REQUEST_LATENCY,
        "Request handling latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STORE_PUT_LATENCY,
        "Mapping store put latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STORE_QUERY_LATENCY,
        "Mapping store query latency in milliseconds"
    );
    describe_counter!(
        METRIC_NOTIFY_FAILURES,
        "Total number of notification publishes that failed"
    );

    debug!("Metrics initialized");
    Ok(handle)
}

/// Record a handled request and its latency.
pub fn record_request(operation: Operation, status: u16, start: Instant) {
    let operation: &'static str = operation.into();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    counter!(METRIC_REQUESTS, "operation" => operation, "status" => status.to_string())
        .increment(1);
    histogram!(METRIC_REQUEST_LATENCY, "operation" => operation).record(latency_ms);
}

/// Increment notification failures counter.
pub fn inc_notify_failures() {
    counter!(METRIC_NOTIFY_FAILURES).increment(1);
}

/// RAII guard for timing operations.
/// Records latency when dropped.
#[derive(Debug)]
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for store puts.
pub fn timer_store_put() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_PUT_LATENCY)
}

/// Create a latency timer for store queries.
pub fn timer_store_query() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_QUERY_LATENCY)
}
