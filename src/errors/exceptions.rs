use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
};
use serde_json::{json, Value};
use thiserror::Error;

use super::codes::ErrorCode;

/// Purpose-built error with its own status, code and message
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error_code}: {message}")]
pub struct CustomException {
    pub status: StatusCode,
    pub error_code: ErrorCode,
    pub message: String,
    /// Structured detail, only surfaced when it is an object or an array
    pub detail: Option<Value>,
}

impl CustomException {
    pub fn new(status: StatusCode, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "The requested resource was not found.",
        )
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        let message: String = message.into();
        let message = if message.is_empty() {
            "A data integrity error occurred.".to_string()
        } else {
            message
        };
        Self::new(StatusCode::CONFLICT, ErrorCode::IntegrityError, message)
    }
}

/// Every error a handler can raise.
///
/// The mapper in [`super::handler`] matches the variants in declaration
/// order; anything that is not one of the recognized kinds ends up as
/// `Unhandled`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Custom(#[from] CustomException),

    #[error("validation failed: {0}")]
    Validation(Value),

    #[error("authentication credentials were not provided")]
    NotAuthenticated,

    #[error("permission denied")]
    PermissionDenied(Option<String>),

    #[error("resource not found")]
    NotFound,

    /// Framework-level failure that maps to no recognized kind
    #[error("request failed ({status}): {detail}")]
    Http { status: StatusCode, detail: String },

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(detail: impl Into<Value>) -> Self {
        Self::Validation(detail.into())
    }

    /// Single-field validation failure, `{field: [message]}`
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Validation(json!({ field: [message] }))
    }

    pub fn permission_denied() -> Self {
        Self::PermissionDenied(None)
    }

    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Self::validation(json!({
                "non_field_errors": [err.body_text()]
            })),
            other => Self::http(other.status(), other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(json!({ "query": [rejection.body_text()] }))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::http(rejection.status(), rejection.body_text())
    }
}
