use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use unified_response::api::{create_router, AppStateInner};
use unified_response::RenderSettings;

// Helper to create test app
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppStateInner {
        instance_id: "test-instance".to_string(),
    });
    create_router(state, RenderSettings::default())
}

async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = create_test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

// Helper to send request and parse JSON response
async fn send_json_request(method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(request).await;
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
    (status, json)
}

// Helper to send request with a raw body and content type
async fn send_body_request(uri: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();

    let (status, _, body) = send(request).await;
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
    (status, json)
}

fn assert_error_envelope(body: &Value, error_code: &str, message: &str) {
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_code"], error_code);
    assert_eq!(body["message"], message);
    assert!(body.as_object().unwrap().contains_key("errors"));
    assert!(body["meta"].is_object());
}

#[tokio::test]
async fn test_health_endpoint_is_not_wrapped() {
    let (status, body) = send_json_request("GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "unified-response");
    assert_eq!(body["instance_id"], "test-instance");
}

#[tokio::test]
async fn test_success_envelope_with_meta() {
    let (status, body) = send_json_request("GET", "/api/success").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "message": "Success",
            "data": {"user_id": 1, "status": "active"},
            "meta": {"request_id": "xyz-123"}
        })
    );
}

#[tokio::test]
async fn test_raw_payload_is_wrapped_by_renderer() {
    let (status, body) = send_json_request("GET", "/api/raw").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Success");
    assert_eq!(body["data"], json!({"user_id": 1, "status": "active"}));
    assert_eq!(body["meta"], json!({}));
}

#[tokio::test]
async fn test_list_items_wrapped() {
    let (status, body) = send_json_request("GET", "/api/items?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["name"], "item-1");
}

#[tokio::test]
async fn test_list_items_bad_query_is_validation_error() {
    let (status, body) = send_json_request("GET", "/api/items?limit=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "validation_error", "Input validation failed.");
    assert!(body["errors"]["query"].is_array());
}

#[tokio::test]
async fn test_create_item() {
    let (status, body) = send_body_request(
        "/api/items",
        "application/json",
        r#"{"name": "Widget", "quantity": 3}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Item created.");
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["quantity"], 3);
    assert!(body["data"]["id"].is_string());
}

#[tokio::test]
async fn test_create_item_field_errors() {
    let (status, body) = send_body_request(
        "/api/items",
        "application/json",
        r#"{"name": "", "quantity": 0}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "validation_error", "Input validation failed.");
    assert_eq!(body["errors"]["name"], json!(["This field may not be blank."]));
    assert!(body["errors"]["quantity"].is_array());
}

#[tokio::test]
async fn test_create_item_missing_field_is_validation_error() {
    let (status, body) =
        send_body_request("/api/items", "application/json", r#"{"name": "Widget"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "validation_error", "Input validation failed.");
    assert!(body["errors"]["non_field_errors"].is_array());
}

#[tokio::test]
async fn test_create_item_malformed_json_keeps_framework_status() {
    let (status, body) =
        send_body_request("/api/items", "application/json", r#"{"name": "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "server_error", "An error occurred.");
    assert!(body["errors"]["detail"].is_string());
}

#[tokio::test]
async fn test_create_item_wrong_content_type() {
    let (status, body) = send_body_request("/api/items", "text/plain", "hello").await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_error_envelope(&body, "server_error", "An error occurred.");
}

#[tokio::test]
async fn test_validation_error_envelope() {
    let (status, body) = send_json_request("GET", "/api/validation-error").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "message": "Input validation failed.",
            "error_code": "validation_error",
            "errors": {"field": ["This field has an error."]},
            "meta": {}
        })
    );
}

#[tokio::test]
async fn test_not_found_exception() {
    let (status, body) = send_json_request("GET", "/api/not-found").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body, "not_found", "The requested resource was not found.");
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn test_integrity_exception_custom_message() {
    let (status, body) = send_json_request("GET", "/api/integrity-error").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_envelope(
        &body,
        "integrity_error",
        "This item already exists in the database.",
    );
}

#[tokio::test]
async fn test_unauthenticated() {
    let (status, body) = send_json_request("GET", "/api/unauthenticated").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(
        &body,
        "authentication_failed",
        "Authentication credentials were not provided or are invalid.",
    );
}

#[tokio::test]
async fn test_forbidden() {
    let (status, body) = send_json_request("GET", "/api/forbidden").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error_envelope(
        &body,
        "permission_denied",
        "You do not have permission to perform this action.",
    );
}

#[tokio::test]
async fn test_unhandled_error_is_generic_500() {
    let (status, body) = send_json_request("GET", "/api/unhandled").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(
        &body,
        "server_error",
        "A server error occurred, please try again later.",
    );
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn test_panic_is_caught() {
    let (status, body) = send_json_request("GET", "/api/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(
        &body,
        "server_error",
        "A server error occurred, please try again later.",
    );
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    for uri in ["/api/does-not-exist", "/nowhere"] {
        let (status, body) = send_json_request("GET", uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
        assert_error_envelope(&body, "not_found", "The requested resource was not found.");
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/api/success")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(request).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");

    let request = Request::builder()
        .uri("/api/success")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(request).await;
    assert!(!headers.get("x-request-id").unwrap().is_empty());
}

#[tokio::test]
async fn test_metrics_endpoint_is_plain_text() {
    // Generate at least one error so the error counter has a series
    send_json_request("GET", "/api/forbidden").await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("api_error_responses_total"));
}

#[tokio::test]
async fn test_openapi_json_is_not_wrapped() {
    let (status, body) = send_json_request("GET", "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].is_string());
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn test_wrong_method_is_error_envelope() {
    for (method, uri) in [("POST", "/api/success"), ("DELETE", "/api/items"), ("POST", "/health")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert!(headers.contains_key("allow"), "{method} {uri}");

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_error_envelope(&body, "server_error", "An error occurred.");
        assert_eq!(body["errors"], json!({"detail": "Method not allowed."}));
    }
}
