//! Prometheus metrics for invoice-dashboard.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec, TextEncoder,
};
use std::time::Duration;

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_http_requests_total",
        "Total number of HTTP requests served",
        &["method", "path", "status"]
    )
    .expect("Failed to register dashboard_http_requests_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dashboard_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register dashboard_http_request_duration_seconds")
});

/// Upstream invoice API calls by operation and outcome
/// (success, server_error, transport_error).
pub static API_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_invoice_api_calls_total",
        "Total number of invoice API calls",
        &["operation", "outcome"]
    )
    .expect("Failed to register dashboard_invoice_api_calls_total")
});

pub static API_CALL_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dashboard_invoice_api_call_duration_seconds",
        "Invoice API call duration in seconds",
        &["operation"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register dashboard_invoice_api_call_duration_seconds")
});

/// Responses dropped because a newer request of the same kind was issued.
pub static STALE_RESPONSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_stale_responses_total",
        "Responses discarded in favour of a newer request",
        &["operation"]
    )
    .expect("Failed to register dashboard_stale_responses_total")
});

pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&API_CALLS_TOTAL);
    Lazy::force(&API_CALL_DURATION);
    Lazy::force(&STALE_RESPONSES_TOTAL);
}

pub fn record_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(elapsed.as_secs_f64());
}

pub fn record_api_call(operation: &str, outcome: &str, elapsed: Duration) {
    API_CALLS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    API_CALL_DURATION
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

pub fn record_stale_response(operation: &str) {
    STALE_RESPONSES_TOTAL.with_label_values(&[operation]).inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default()
}
