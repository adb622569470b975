use utoipa::OpenApi;

use crate::api::handlers::{
    Item, ItemEnvelope, ItemListEnvelope, ListParams, NewItem, UserStatus, UserStatusEnvelope,
};
use crate::response::ErrorEnvelope;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unified Response API",
        version = "0.1.0",
        description = "Every response is a JSON envelope. Successful payloads are wrapped as {status, message, data, meta}; failures are reported as {status, message, error_code, errors, meta}.",
        contact(
            name = "Unified Response API",
        )
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::success,
        crate::api::handlers::raw,
        crate::api::handlers::list_items,
        crate::api::handlers::create_item,
        crate::api::handlers::validation_error,
        crate::api::handlers::not_found,
        crate::api::handlers::integrity_error,
        crate::api::handlers::unauthenticated,
        crate::api::handlers::forbidden,
        crate::api::handlers::unhandled,
        crate::api::handlers::panic_handler,
    ),
    components(
        schemas(
            ErrorEnvelope,
            UserStatus,
            UserStatusEnvelope,
            Item,
            ItemEnvelope,
            ItemListEnvelope,
            NewItem,
            ListParams,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "demo", description = "Successful responses and the success envelope"),
        (name = "errors", description = "One endpoint per error kind"),
    )
)]
pub struct ApiDoc;
