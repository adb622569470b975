//! Prometheus metrics for requests and envelopes

pub mod middleware;
pub mod registry;

use anyhow::anyhow;
use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

use crate::errors::ApiError;

/// Prometheus exposition endpoint.
///
/// Encoding failures surface as the standard server error envelope.
pub async fn metrics_handler() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| anyhow!("failed to encode metrics: {e}"))?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}

pub use registry::{
    init_metrics, API_ERROR_RESPONSES_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
    RENDERED_RESPONSES_TOTAL,
};
