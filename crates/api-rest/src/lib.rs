//! # API REST
//!
//! REST API implementation for Casebook.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status-code mapping)
//!
//! Core data operations live in `casebook-core`.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use casebook_core::{ClientMutationService, ClientQueryService, RelationService, Store};

/// Application state shared across REST API handlers.
///
/// Each service receives the store handle explicitly at construction; there
/// is no ambient process-wide connection.
#[derive(Clone)]
pub struct AppState {
    pub queries: ClientQueryService,
    pub mutations: ClientMutationService,
    pub relations: RelationService,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            queries: ClientQueryService::new(store.clone()),
            mutations: ClientMutationService::new(store.clone()),
            relations: RelationService::new(store),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_clients,
        handlers::search_clients,
        handlers::create_client,
        handlers::update_client,
        handlers::delete_client,
        handlers::get_client_family,
        handlers::add_relative,
        handlers::update_relative,
        handlers::delete_relative,
    ),
    components(schemas(
        dto::HealthRes,
        dto::ClientsRes,
        dto::SearchRes,
        dto::MessageRes,
        dto::ErrorRes,
        dto::RelativeReq,
        casebook_core::ClientRecord,
        casebook_core::ClientWithRelatives,
        casebook_core::ClientFamily,
        casebook_core::Relative,
        casebook_core::SearchEntry,
    ))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/clients", get(handlers::list_clients))
        .route("/clients", post(handlers::create_client))
        .route("/clients/search", get(handlers::search_clients))
        .route("/clients/:client_id", put(handlers::update_client))
        .route("/clients/:client_id", delete(handlers::delete_client))
        .route("/clients/:client_id/family", get(handlers::get_client_family))
        .route("/clients/:client_id/relatives", post(handlers::add_relative))
        .route("/clients/:client_id/relatives", put(handlers::update_relative))
        .route(
            "/clients/:client_id/relatives/:relative_id",
            delete(handlers::delete_relative),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
