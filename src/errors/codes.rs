use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Machine-readable error codes carried in the `error_code` field of error envelopes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Credentials missing or invalid
    AuthenticationFailed,

    /// Authenticated but not allowed
    PermissionDenied,

    /// Resource does not exist
    NotFound,

    /// Unique constraint or similar data conflict
    IntegrityError,

    /// Anything the server could not classify
    ServerError,

    /// Code chosen by a purpose-built exception
    Custom(Cow<'static, str>),
}

impl ErrorCode {
    pub fn custom(code: impl Into<Cow<'static, str>>) -> Self {
        let code: Cow<'static, str> = code.into();
        // Keep well-known codes on their own variant so equality stays meaningful
        match Self::from_known(&code) {
            Some(known) => known,
            None => Self::Custom(code),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ValidationError => "validation_error",
            Self::AuthenticationFailed => "authentication_failed",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::IntegrityError => "integrity_error",
            Self::ServerError => "server_error",
            Self::Custom(code) => &**code,
        }
    }

    fn from_known(code: &str) -> Option<Self> {
        match code {
            "validation_error" => Some(Self::ValidationError),
            "authentication_failed" => Some(Self::AuthenticationFailed),
            "permission_denied" => Some(Self::PermissionDenied),
            "not_found" => Some(Self::NotFound),
            "integrity_error" => Some(Self::IntegrityError),
            "server_error" => Some(Self::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::custom(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes_render_snake_case() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "validation_error");
        assert_eq!(ErrorCode::AuthenticationFailed.as_str(), "authentication_failed");
        assert_eq!(ErrorCode::PermissionDenied.as_str(), "permission_denied");
        assert_eq!(ErrorCode::NotFound.as_str(), "not_found");
        assert_eq!(ErrorCode::IntegrityError.as_str(), "integrity_error");
        assert_eq!(ErrorCode::ServerError.as_str(), "server_error");
    }

    #[test]
    fn test_custom_code_normalizes_known_names() {
        assert_eq!(ErrorCode::custom("not_found"), ErrorCode::NotFound);
        assert_eq!(
            ErrorCode::custom("quota_exceeded"),
            ErrorCode::Custom(Cow::Borrowed("quota_exceeded"))
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_value(ErrorCode::custom("quota_exceeded")).unwrap();
        assert_eq!(json, serde_json::json!("quota_exceeded"));

        let code: ErrorCode = serde_json::from_str("\"permission_denied\"").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
        assert_eq!(code.to_string(), "permission_denied");
    }
}
