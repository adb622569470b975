use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::errors::ErrorCode;

/// Free-form metadata attached to every envelope
pub type Meta = Map<String, Value>;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Envelope wrapped around every successful payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always "success"
    #[serde(deserialize_with = "success_status")]
    status: String,
    pub message: String,
    pub data: T,
    pub meta: Meta,
}

/// Envelope returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always "error"
    #[schema(example = "error")]
    #[serde(deserialize_with = "error_status")]
    status: String,
    /// Human-readable summary
    #[schema(example = "Input validation failed.")]
    pub message: String,
    /// Error code for programmatic handling
    #[schema(value_type = String, example = "validation_error")]
    pub error_code: ErrorCode,
    /// Field-level or structured error details, null when there are none
    pub errors: Option<Value>,
    #[schema(value_type = Object)]
    pub meta: Meta,
}

impl<T> SuccessEnvelope<T> {
    pub fn status(&self) -> &str {
        &self.status
    }
}

impl ErrorEnvelope {
    pub fn status(&self) -> &str {
        &self.status
    }
}

fn success_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    sentinel(deserializer, STATUS_SUCCESS)
}

fn error_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    sentinel(deserializer, STATUS_ERROR)
}

fn sentinel<'de, D: Deserializer<'de>>(deserializer: D, expected: &str) -> Result<String, D::Error> {
    let status = String::deserialize(deserializer)?;
    if status == expected {
        Ok(status)
    } else {
        Err(de::Error::invalid_value(
            de::Unexpected::Str(&status),
            &expected,
        ))
    }
}

/// Build a success envelope
pub fn format_success<T>(data: T, message: impl Into<String>, meta: Option<Meta>) -> SuccessEnvelope<T> {
    SuccessEnvelope {
        status: STATUS_SUCCESS.to_string(),
        message: message.into(),
        data,
        meta: meta.unwrap_or_default(),
    }
}

/// Build an error envelope
///
/// Empty `errors` (null, `{}`, `[]`, `""`) collapse to null so clients only
/// need a single "no details" check.
pub fn format_error(
    message: impl Into<String>,
    error_code: ErrorCode,
    errors: Option<Value>,
    meta: Option<Meta>,
) -> ErrorEnvelope {
    ErrorEnvelope {
        status: STATUS_ERROR.to_string(),
        message: message.into(),
        error_code,
        errors: errors.filter(|value| !is_empty_value(value)),
        meta: meta.unwrap_or_default(),
    }
}

/// True when `value` already carries the success sentinel
pub fn is_success_envelope(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|object| object.get("status"))
        .and_then(Value::as_str)
        == Some(STATUS_SUCCESS)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(object) => object.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_success_shape() {
        let envelope = format_success(json!({"user_id": 1}), DEFAULT_SUCCESS_MESSAGE, None);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "success",
                "message": "Success",
                "data": {"user_id": 1},
                "meta": {}
            })
        );
    }

    #[test]
    fn test_format_success_keeps_meta() {
        let mut meta = Meta::new();
        meta.insert("request_id".to_string(), json!("xyz-123"));

        let envelope = format_success(vec![1, 2, 3], "Listed", Some(meta));
        assert_eq!(envelope.message, "Listed");
        assert_eq!(envelope.meta["request_id"], "xyz-123");
    }

    #[test]
    fn test_format_error_shape() {
        let envelope = format_error(
            "Input validation failed.",
            ErrorCode::ValidationError,
            Some(json!({"field": ["bad"]})),
            None,
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "error",
                "message": "Input validation failed.",
                "error_code": "validation_error",
                "errors": {"field": ["bad"]},
                "meta": {}
            })
        );
    }

    #[test]
    fn test_format_error_collapses_empty_errors() {
        for empty in [json!(null), json!({}), json!([]), json!("")] {
            let envelope = format_error("x", ErrorCode::ServerError, Some(empty), None);
            assert!(envelope.errors.is_none());
        }

        // zero and false are real values, not "empty"
        let envelope = format_error("x", ErrorCode::ServerError, Some(json!(0)), None);
        assert_eq!(envelope.errors, Some(json!(0)));
    }

    #[test]
    fn test_error_envelope_serializes_null_errors() {
        let envelope = format_error("Gone", ErrorCode::NotFound, None, None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["errors"].is_null());
        assert!(json.as_object().unwrap().contains_key("errors"));
    }

    #[test]
    fn test_deserialize_rejects_wrong_status() {
        let ok: SuccessEnvelope<Value> = serde_json::from_value(json!({
            "status": "success", "message": "Success", "data": 1, "meta": {}
        }))
        .unwrap();
        assert_eq!(ok.status(), STATUS_SUCCESS);

        let wrong = serde_json::from_value::<SuccessEnvelope<Value>>(json!({
            "status": "error", "message": "Success", "data": 1, "meta": {}
        }));
        assert!(wrong.is_err());

        let wrong = serde_json::from_value::<ErrorEnvelope>(json!({
            "status": "success",
            "message": "Gone",
            "error_code": "not_found",
            "errors": null,
            "meta": {}
        }));
        assert!(wrong.is_err());

        let envelope = format_error("Gone", ErrorCode::NotFound, None, None);
        let parsed: ErrorEnvelope =
            serde_json::from_value(serde_json::to_value(&envelope).unwrap()).unwrap();
        assert_eq!(parsed.status(), STATUS_ERROR);
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_success_sentinel_detection() {
        assert!(is_success_envelope(&json!({"status": "success", "data": 1})));
        assert!(!is_success_envelope(&json!({"status": "active"})));
        assert!(!is_success_envelope(&json!(["success"])));
        assert!(!is_success_envelope(&json!("success")));
    }
}
