//! Prometheus metrics for request tracking and monitoring.
//!
//! This module provides metrics for:
//! - HTTP request latency and counts per endpoint
//! - Validation failures per endpoint
//! - Failed health evaluations
//! - Page renders

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Validation failures counter metric name.
pub const METRIC_VALIDATION_FAILURES: &str = "validation_failures_total";
/// Unhealthy health checks counter metric name.
pub const METRIC_HEALTH_CHECK_FAILURES: &str = "health_check_failures_total";
/// Page render latency metric name.
pub const METRIC_PAGE_RENDER_LATENCY: &str = "page_render_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_PAGE_RENDER_LATENCY,
        "Dashboard page render latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests");
    describe_counter!(
        METRIC_VALIDATION_FAILURES,
        "Total number of requests rejected by input validation"
    );
    describe_counter!(
        METRIC_HEALTH_CHECK_FAILURES,
        "Total number of health checks that reported unhealthy or failed"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and register metric descriptions.
///
/// Can only succeed once per process. Descriptions are registered after
/// the recorder is in place, otherwise they go to the no-op recorder.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency and count.
pub fn record_http_request(start: Instant, endpoint: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
    counter!(
        METRIC_HTTP_REQUESTS,
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment validation failures counter.
pub fn inc_validation_failures(endpoint: &'static str) {
    counter!(METRIC_VALIDATION_FAILURES, "endpoint" => endpoint).increment(1);
}

/// Increment failed health checks counter.
pub fn inc_health_check_failures() {
    counter!(METRIC_HEALTH_CHECK_FAILURES).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    page: &'static str,
}

impl LatencyTimer {
    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.elapsed_ms();
        histogram!(self.metric_name, "page" => self.page).record(latency_ms);
    }
}

/// Create a latency timer for rendering `page`.
pub fn timer_page_render(page: &'static str) -> LatencyTimer {
    LatencyTimer {
        start: Instant::now(),
        metric_name: METRIC_PAGE_RENDER_LATENCY,
        page,
    }
}
