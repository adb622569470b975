use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    create_item, forbidden, health, integrity_error, list_items, not_found, panic_handler, raw,
    success, unauthenticated, unhandled, validation_error, AppState,
};
use super::middleware::logging_middleware;
use super::openapi::ApiDoc;
use crate::errors::{handle_panic, method_not_allowed_fallback, not_found_fallback};
use crate::metrics;
use crate::response::{render_unified, RenderSettings};

/// Routes whose successful responses go through the renderer
fn api_router(settings: RenderSettings) -> Router<AppState> {
    Router::new()
        .route("/success", get(success))
        .route("/raw", get(raw))
        .route("/items", get(list_items).post(create_item))
        .route("/validation-error", get(validation_error))
        .route("/not-found", get(not_found))
        .route("/integrity-error", get(integrity_error))
        .route("/unauthenticated", get(unauthenticated))
        .route("/forbidden", get(forbidden))
        .route("/unhandled", get(unhandled))
        .route("/panic", get(panic_handler))
        // Must follow the routes it applies to
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .fallback(not_found_fallback)
        .layer(middleware::from_fn_with_state(settings, render_unified))
}

pub fn create_router(state: AppState, settings: RenderSettings) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // Enveloped API
        .nest("/api", api_router(settings))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .fallback(not_found_fallback)
        // Add middleware (order matters: panic -> compression -> logging -> metrics -> cors -> trace)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
