//! Unified JSON envelopes for axum APIs.
//!
//! Successful payloads are wrapped as `{status, message, data, meta}` by the
//! [`response::render_unified`] middleware, and every [`errors::ApiError`]
//! renders as `{status, message, error_code, errors, meta}`.

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod response;

pub use errors::{ApiError, CustomException, ErrorCode};
pub use response::{ApiSuccess, ErrorEnvelope, RenderSettings, SuccessEnvelope};
