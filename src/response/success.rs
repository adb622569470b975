use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::formatter::{format_success, Meta, DEFAULT_SUCCESS_MESSAGE};

/// Handler return type that emits a fully formed success envelope.
///
/// Use it when a handler wants to pick the message, meta or a non-200 success
/// status. Handlers returning a bare `Json` payload are wrapped by the
/// renderer instead.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T> {
    status: StatusCode,
    message: String,
    data: T,
    meta: Meta,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            data,
            meta: Meta::new(),
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self::new(data).with_status(StatusCode::CREATED)
    }

    /// Success statuses only. Anything outside 2xx is ignored in favour of
    /// 200, errors go through [`crate::errors::ApiError`].
    pub fn with_status(mut self, status: StatusCode) -> Self {
        if status.is_success() {
            self.status = status;
        } else {
            warn!(status = %status.as_u16(), "Ignoring non-2xx status on a success envelope");
            self.status = StatusCode::OK;
        }
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let envelope = format_success(self.data, self.message, Some(self.meta));
        (self.status, Json(envelope)).into_response()
    }
}
