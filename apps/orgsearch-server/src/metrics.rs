//! Prometheus metrics for orgsearch-server.
//!
//! Exposes server metrics in Prometheus format at the `/metrics` endpoint.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "orgsearch_http_requests_total",
        "Total number of HTTP requests processed"
    );
    describe_histogram!(
        "orgsearch_http_request_duration_seconds",
        "Duration of HTTP requests in seconds"
    );
    describe_counter!(
        "orgsearch_http_errors_total",
        "Total number of HTTP responses with a 4xx or 5xx status"
    );

    Ok(handle)
}

/// Record one finished request. `route` is the matched route template, not
/// the raw path, to keep label cardinality bounded.
pub fn record_http_request(method: &str, route: &str, status: u16, duration: Duration) {
    let outcome = if status >= 400 { "error" } else { "ok" };
    counter!(
        "orgsearch_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "orgsearch_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(duration.as_secs_f64());

    if status >= 400 {
        counter!(
            "orgsearch_http_errors_total",
            "route" => route.to_string(),
            "code" => status.to_string()
        )
        .increment(1);
    }
}
