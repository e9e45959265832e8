//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "census_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "census_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "census_http_requests_in_flight";

    // Store metrics
    pub const PARTICIPANTS_TOTAL: &str = "census_participants_total";
    pub const PARTICIPANT_MUTATIONS_TOTAL: &str = "census_participant_mutations_total";

    // Access control
    pub const ADMIN_GATE_REJECTIONS_TOTAL: &str = "census_admin_gate_rejections_total";
    pub const RATE_LIMIT_HITS_TOTAL: &str = "census_rate_limit_hits_total";
}

// Any path segment holding a raw or percent-encoded `@` is treated as an email.
static EMAIL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[^/]*(@|%40)[^/]*").expect("valid email segment pattern"));

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Update the stored participants gauge.
pub fn set_participants_total(count: usize) {
    gauge!(names::PARTICIPANTS_TOTAL).set(count as f64);
}

/// Record a create/update/delete attempt and how it ended.
pub fn record_participant_mutation(op: &str, outcome: &str) {
    let labels = [("op", op.to_string()), ("outcome", outcome.to_string())];
    counter!(names::PARTICIPANT_MUTATIONS_TOTAL, &labels).increment(1);
}

/// Record a request turned away by the admin gate.
pub fn record_admin_rejection(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::ADMIN_GATE_REJECTIONS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse emails in paths so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    EMAIL_SEGMENT.replace_all(path, "/:email").into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/participants/details/example@example.com"),
            "/participants/details/:email"
        );
        assert_eq!(
            sanitize_path("/participants/work/jane%40example.org"),
            "/participants/work/:email"
        );
        assert_eq!(sanitize_path("/participants/a@b.co"), "/participants/:email");
        assert_eq!(sanitize_path("/participants/details"), "/participants/details");
    }
}
