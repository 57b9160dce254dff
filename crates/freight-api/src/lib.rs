//! OpenFreight Messaging API
//!
//! REST surface over the conversation & messaging engine. Callers are
//! authenticated upstream by the platform gateway; this crate resolves the
//! forwarded identity, derives its scope and exposes the conversation
//! operations as JSON endpoints with a `{ "data": ... }` envelope.

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use freight_messaging::{ConversationService, UserDirectory};

pub use models::*;

/// API state
pub struct ApiState {
    /// Conversation engine
    pub service: ConversationService,
    /// Identity Provider registry, shared with the engine
    pub directory: Arc<dyn UserDirectory>,
}

impl ApiState {
    /// Build the state over an Identity Provider registry
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            service: ConversationService::new(Arc::clone(&directory)),
            directory,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OpenFreight Messaging API",
        version = "1.0.0",
        description = "Multi-tenant support channel for the OpenFreight logistics platform",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::conversations::list_mine,
        routes::conversations::get_conversation,
        routes::conversations::create_conversation,
        routes::conversations::post_message,
        routes::conversations::change_status,
        routes::users::search_users,
        routes::users::org_users,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            ErrorBody,
            ConversationDto, ConversationDetail, CreateConversationRequest,
            MessageDto, PostMessageRequest, ChangeStatusRequest,
            RecipientDto,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "conversations", description = "Conversation & message management"),
        (name = "users", description = "Recipient discovery")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/conversations", routes::conversations::router())
        .nest("/users", routes::users::router())
        .route("/org/users", get(routes::users::org_users))
}
