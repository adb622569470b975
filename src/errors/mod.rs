//! Error kinds, error codes, and their translation into error envelopes

pub mod codes;
pub mod exceptions;
pub mod handler;

pub use codes::ErrorCode;
pub use exceptions::{ApiError, CustomException};
pub use handler::{handle_error, handle_panic, method_not_allowed_fallback, not_found_fallback};
