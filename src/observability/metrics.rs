//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, matched path, status
//! - `http_request_duration_seconds` (histogram): latency by method, matched path
//! - `purchases_total` (counter): purchase attempts by outcome
//!
//! # Design Decisions
//! - One process-wide Prometheus recorder, installed lazily and shared
//! - Path labels use the matched route template, never the raw URI
//! - Method labels come from a fixed set; anything else is `other`
//! - Histogram buckets tuned for typical web latencies

use std::sync::Mutex;
use std::time::{Duration, Instant};

use metrics::Unit;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const PURCHASES_TOTAL: &str = "purchases_total";

/// Method label for any method outside the standard set.
pub const OTHER_METHOD: &str = "other";

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How often histogram storage is compacted.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: {0}")]
    Install(#[from] BuildError),
}

/// Install the global Prometheus recorder.
///
/// Safe to call more than once: later calls return a handle to the
/// recorder installed by the first.
pub fn install() -> Result<PrometheusHandle, MetricsError> {
    let mut slot = HANDLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    describe();
    tracing::info!("Prometheus recorder installed");

    *slot = Some(handle.clone());
    Ok(handle)
}

fn describe() {
    metrics::describe_counter!(
        HTTP_REQUESTS_TOTAL,
        Unit::Count,
        "Total HTTP requests handled by the demo shop"
    );
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_counter!(
        PURCHASES_TOTAL,
        Unit::Count,
        "Purchase attempts by outcome"
    );
}

/// Label value for an HTTP method. Extension methods share one series.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "HEAD" => "HEAD",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        _ => OTHER_METHOD,
    }
}

/// Record one handled request.
pub fn record_request(method: &str, path: &str, status: u16, started: Instant) {
    let method = method_label(method);
    let path = path.to_string();

    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method,
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a purchase outcome (`completed` or `declined`).
pub fn record_purchase(outcome: &'static str) {
    metrics::counter!(PURCHASES_TOTAL, "outcome" => outcome).increment(1);
}

/// Render the Prometheus text exposition.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}
