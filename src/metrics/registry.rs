use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Envelope Metrics
    pub static ref API_ERROR_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "api_error_responses_total",
        "Total error envelopes returned",
        &["error_code"]
    )
    .unwrap();

    pub static ref RENDERED_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rendered_responses_total",
        "Responses seen by the renderer",
        &["outcome"]  // outcome: wrapped, passthrough
    )
    .unwrap();
}

/// Force registration so every series shows up on the first scrape
pub fn init_metrics() {
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&API_ERROR_RESPONSES_TOTAL);
    lazy_static::initialize(&RENDERED_RESPONSES_TOTAL);
}
