use axum::{
    body::Body,
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::warn;

use super::formatter::{format_success, is_success_envelope};
use crate::errors::ApiError;
use crate::metrics::RENDERED_RESPONSES_TOTAL;

/// Settings for [`render_unified`]
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Message placed in envelopes the renderer creates
    pub success_message: String,
    /// Largest response body the renderer will buffer
    pub max_body_bytes: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            success_message: super::formatter::DEFAULT_SUCCESS_MESSAGE.to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Middleware that wraps successful JSON payloads in the success envelope.
///
/// Non-2xx responses are already error envelopes and pass through, as do
/// non-JSON bodies and payloads that already carry `"status": "success"`.
pub async fn render_unified(
    State(settings): State<RenderSettings>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !response.status().is_success() || !is_json(response.headers()) {
        RENDERED_RESPONSES_TOTAL.with_label_values(&["passthrough"]).inc();
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, settings.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::from(anyhow::anyhow!("failed to buffer response body: {e}"))
                .into_response();
        }
    };

    // 204 and other bodiless successes have nothing to wrap
    if bytes.is_empty() {
        RENDERED_RESPONSES_TOTAL.with_label_values(&["passthrough"]).inc();
        return Response::from_parts(parts, Body::from(bytes));
    }

    let data: Value = match serde_json::from_slice(&bytes) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "Response declared JSON but did not parse, passing through");
            RENDERED_RESPONSES_TOTAL.with_label_values(&["passthrough"]).inc();
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    if is_success_envelope(&data) {
        RENDERED_RESPONSES_TOTAL.with_label_values(&["passthrough"]).inc();
        return Response::from_parts(parts, Body::from(bytes));
    }

    let envelope = format_success(data, settings.success_message.as_str(), None);
    let rendered = match serde_json::to_vec(&envelope) {
        Ok(rendered) => rendered,
        Err(e) => {
            return ApiError::from(anyhow::Error::new(e).context("failed to render envelope"))
                .into_response();
        }
    };

    RENDERED_RESPONSES_TOTAL.with_label_values(&["wrapped"]).inc();
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(rendered))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
