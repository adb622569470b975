use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::codes::ErrorCode;
use super::exceptions::ApiError;
use crate::response::formatter::{format_error, ErrorEnvelope};

pub const VALIDATION_MESSAGE: &str = "Input validation failed.";
pub const NOT_AUTHENTICATED_MESSAGE: &str =
    "Authentication credentials were not provided or are invalid.";
pub const NOT_AUTHENTICATED_DETAIL: &str = "Authentication credentials were not provided.";
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred.";
pub const METHOD_NOT_ALLOWED_DETAIL: &str = "Method not allowed.";
pub const SERVER_ERROR_MESSAGE: &str = "A server error occurred, please try again later.";

/// Translate an error into its HTTP status and error envelope
pub fn handle_error(err: &ApiError) -> (StatusCode, ErrorEnvelope) {
    match err {
        ApiError::Custom(exc) => {
            let errors = exc
                .detail
                .clone()
                .filter(|detail| detail.is_object() || detail.is_array());
            (
                exc.status,
                format_error(exc.message.clone(), exc.error_code.clone(), errors, None),
            )
        }
        ApiError::Validation(detail) => {
            let errors = match detail {
                Value::String(message) => json!([message]),
                other => other.clone(),
            };
            (
                StatusCode::BAD_REQUEST,
                format_error(VALIDATION_MESSAGE, ErrorCode::ValidationError, Some(errors), None),
            )
        }
        ApiError::NotAuthenticated => (
            StatusCode::UNAUTHORIZED,
            format_error(
                NOT_AUTHENTICATED_MESSAGE,
                ErrorCode::AuthenticationFailed,
                Some(json!({ "detail": NOT_AUTHENTICATED_DETAIL })),
                None,
            ),
        ),
        ApiError::PermissionDenied(detail) => {
            let detail = detail.as_deref().unwrap_or(PERMISSION_DENIED_MESSAGE);
            (
                StatusCode::FORBIDDEN,
                format_error(
                    PERMISSION_DENIED_MESSAGE,
                    ErrorCode::PermissionDenied,
                    Some(json!({ "detail": detail })),
                    None,
                ),
            )
        }
        ApiError::NotFound => (
            StatusCode::NOT_FOUND,
            format_error(NOT_FOUND_MESSAGE, ErrorCode::NotFound, None, None),
        ),
        ApiError::Http { status, detail } => (
            *status,
            format_error(
                GENERIC_ERROR_MESSAGE,
                ErrorCode::ServerError,
                Some(json!({ "detail": detail })),
                None,
            ),
        ),
        ApiError::Unhandled(_) => (StatusCode::INTERNAL_SERVER_ERROR, server_error_envelope()),
    }
}

fn server_error_envelope() -> ErrorEnvelope {
    format_error(SERVER_ERROR_MESSAGE, ErrorCode::ServerError, None, None)
}

/// Write an error envelope, tagging the response with its code for the
/// logging and metrics middleware
pub fn envelope_response(status: StatusCode, envelope: ErrorEnvelope) -> Response {
    let code = envelope.error_code.clone();
    let mut response = (status, Json(envelope)).into_response();
    response.extensions_mut().insert(code);
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = handle_error(&self);

        match &self {
            ApiError::Unhandled(err) => error!(error = ?err, "Unhandled error"),
            _ if status.is_server_error() => error!(error = %self, status = %status.as_u16(), "Request failed"),
            _ => debug!(
                error = %self,
                status = %status.as_u16(),
                error_code = %envelope.error_code,
                "Request rejected"
            ),
        }

        envelope_response(status, envelope)
    }
}

/// Router fallback for unknown routes
pub async fn not_found_fallback() -> ApiError {
    ApiError::NotFound
}

/// Router fallback for known paths called with an unsupported method.
/// axum still adds the `Allow` header to this response.
pub async fn method_not_allowed_fallback() -> ApiError {
    ApiError::http(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_DETAIL)
}

/// Convert a caught handler panic into the generic server error envelope
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else {
        "unknown panic payload"
    };

    error!(panic = %message, "Handler panicked");
    envelope_response(StatusCode::INTERNAL_SERVER_ERROR, server_error_envelope())
}
