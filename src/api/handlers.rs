use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{ApiError, CustomException};
use crate::response::ApiSuccess;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub instance_id: String,
}

/// Largest quantity accepted by `POST /api/items`
pub const MAX_ITEM_QUANTITY: u32 = 1000;

/// Account status payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserStatus {
    pub user_id: u64,
    #[schema(example = "active")]
    pub status: String,
}

/// Item creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewItem {
    /// Display name, must not be blank
    pub name: String,
    /// Between 1 and 1000
    pub quantity: u32,
}

/// Stored item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
}

/// Item listing parameters
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of items to return (default: 3)
    pub limit: Option<usize>,
}

// Concrete envelope types for OpenAPI generation
/// Success envelope around a user status
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatusEnvelope {
    /// Always "success"
    pub status: String,
    pub message: String,
    pub data: UserStatus,
    #[schema(value_type = Object)]
    pub meta: Map<String, Value>,
}

/// Success envelope around an item
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemEnvelope {
    /// Always "success"
    pub status: String,
    pub message: String,
    pub data: Item,
    #[schema(value_type = Object)]
    pub meta: Map<String, Value>,
}

/// Success envelope around an item list
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListEnvelope {
    /// Always "success"
    pub status: String,
    pub message: String,
    pub data: Vec<Item>,
    #[schema(value_type = Object)]
    pub meta: Map<String, Value>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "unified-response",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Explicit success envelope with meta
#[utoipa::path(
    get,
    path = "/api/success",
    tag = "demo",
    responses(
        (status = 200, description = "User status", body = UserStatusEnvelope)
    )
)]
pub async fn success() -> ApiSuccess<UserStatus> {
    ApiSuccess::new(active_user()).with_meta("request_id", "xyz-123")
}

/// Bare payload, wrapped by the renderer
#[utoipa::path(
    get,
    path = "/api/raw",
    tag = "demo",
    responses(
        (status = 200, description = "User status", body = UserStatusEnvelope)
    )
)]
pub async fn raw() -> Json<UserStatus> {
    Json(active_user())
}

/// List sample items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "demo",
    params(ListParams),
    responses(
        (status = 200, description = "Items", body = ItemListEnvelope),
        (status = 400, description = "Malformed query string", body = crate::response::ErrorEnvelope)
    )
)]
pub async fn list_items(
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(3);

    let items = (1..=limit.min(100))
        .map(|n| Item {
            id: Uuid::new_v4(),
            name: format!("item-{n}"),
            quantity: n as u32,
        })
        .collect();

    Ok(Json(items))
}

/// Validate and create an item
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "demo",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created", body = ItemEnvelope),
        (status = 400, description = "Validation failed", body = crate::response::ErrorEnvelope),
        (status = 415, description = "Body is not JSON", body = crate::response::ErrorEnvelope)
    )
)]
pub async fn create_item(
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<ApiSuccess<Item>, ApiError> {
    let Json(new_item) = payload?;
    validate_new_item(&new_item)?;

    let item = Item {
        id: Uuid::new_v4(),
        name: new_item.name.trim().to_string(),
        quantity: new_item.quantity,
    };
    info!(item_id = %item.id, name = %item.name, "Item created");

    Ok(ApiSuccess::created(item).with_message("Item created."))
}

/// Collect every field problem before failing, `{field: [messages]}`
fn validate_new_item(item: &NewItem) -> Result<(), ApiError> {
    let mut errors = Map::new();

    if item.name.trim().is_empty() {
        errors.insert("name".to_string(), json!(["This field may not be blank."]));
    }
    if item.quantity == 0 || item.quantity > MAX_ITEM_QUANTITY {
        errors.insert(
            "quantity".to_string(),
            json!([format!("Ensure this value is between 1 and {MAX_ITEM_QUANTITY}.")]),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(Value::Object(errors)))
    }
}

/// Always fails validation
#[utoipa::path(
    get,
    path = "/api/validation-error",
    tag = "errors",
    responses((status = 400, description = "validation_error", body = crate::response::ErrorEnvelope))
)]
pub async fn validation_error() -> Result<Json<Value>, ApiError> {
    Err(ApiError::validation(json!({
        "field": ["This field has an error."]
    })))
}

/// Raises the built-in not-found exception
#[utoipa::path(
    get,
    path = "/api/not-found",
    tag = "errors",
    responses((status = 404, description = "not_found", body = crate::response::ErrorEnvelope))
)]
pub async fn not_found() -> Result<Json<Value>, ApiError> {
    Err(CustomException::not_found().into())
}

/// Raises the integrity exception with a custom message
#[utoipa::path(
    get,
    path = "/api/integrity-error",
    tag = "errors",
    responses((status = 409, description = "integrity_error", body = crate::response::ErrorEnvelope))
)]
pub async fn integrity_error() -> Result<Json<Value>, ApiError> {
    Err(CustomException::integrity("This item already exists in the database.").into())
}

/// Rejects as unauthenticated
#[utoipa::path(
    get,
    path = "/api/unauthenticated",
    tag = "errors",
    responses((status = 401, description = "authentication_failed", body = crate::response::ErrorEnvelope))
)]
pub async fn unauthenticated() -> Result<Json<Value>, ApiError> {
    Err(ApiError::NotAuthenticated)
}

/// Rejects as forbidden
#[utoipa::path(
    get,
    path = "/api/forbidden",
    tag = "errors",
    responses((status = 403, description = "permission_denied", body = crate::response::ErrorEnvelope))
)]
pub async fn forbidden() -> Result<Json<Value>, ApiError> {
    Err(ApiError::permission_denied())
}

/// Fails with an unclassified error
#[utoipa::path(
    get,
    path = "/api/unhandled",
    tag = "errors",
    responses((status = 500, description = "server_error", body = crate::response::ErrorEnvelope))
)]
pub async fn unhandled() -> Result<Json<Value>, ApiError> {
    Err(anyhow::anyhow!("simulated failure in a downstream dependency").into())
}

/// Panics inside the handler
#[utoipa::path(
    get,
    path = "/api/panic",
    tag = "errors",
    responses((status = 500, description = "server_error", body = crate::response::ErrorEnvelope))
)]
pub async fn panic_handler() -> Json<Value> {
    panic!("simulated handler panic")
}

fn active_user() -> UserStatus {
    UserStatus {
        user_id: 1,
        status: "active".to_string(),
    }
}
