//! Observability utilities for the social events service.
//!
//! - Prometheus metrics recording and export
//! - Event domain counters
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, EventMetrics};
//!
//! init_metrics()?;
//!
//! EventMetrics::record_operation("create", "success");
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod events;
pub mod middleware;

pub use events::EventMetrics;
pub use middleware::metrics_middleware;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus metrics recorder.
///
/// Safe to call more than once; later calls return the handle installed by
/// the first one.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Event metrics
    describe_counter!(
        "events_operations_total",
        "Event store operations by operation and outcome"
    );
    describe_counter!(
        "events_joins_total",
        "Join requests that matched an existing event"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_before_and_after_init() {
        if get_metrics_handle().is_none() {
            assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
        }

        let first = init_metrics().unwrap() as *const PrometheusHandle;
        let second = init_metrics().unwrap() as *const PrometheusHandle;
        assert_eq!(first, second);

        EventMetrics::record_operation("create", "success");
        let rendered = metrics_handler().await;
        assert!(rendered.contains("events_operations_total"));
    }
}
