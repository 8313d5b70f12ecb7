//! REST endpoint handlers.
//!
//! Each handler obtains the relevant core service from [`AppState`], performs
//! one logical operation, and serializes a JSON result. Error mapping to
//! status codes is shared in [`crate::error`].

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
};

use casebook_core::{ClientFamily, ClientRecord, Document};

use crate::dto::{ClientsRes, ErrorRes, HealthRes, MessageRes, RelativeReq, SearchParams, SearchRes};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Casebook REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "List of clients with resolved relatives", body = ClientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all clients
///
/// Retrieves every client document, each decorated with its resolved
/// relatives (`{id, fullName, relationship}` per relation record).
///
/// # Errors
/// Returns `500 Internal Server Error` if the store fails.
#[axum::debug_handler]
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<ClientsRes>, ApiError> {
    let clients = state.queries.list().await?;
    Ok(Json(ClientsRes { clients }))
}

#[utoipa::path(
    get,
    path = "/clients/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matched clients and their relatives, deduplicated", body = SearchRes),
        (status = 400, description = "familyName missing or invalid", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Search clients by family name
///
/// Matches the `familyName` fragment case-insensitively against each
/// client's full name. Matched clients are returned with their relatives;
/// relatives not matching on their own are appended in relative projection
/// shape. No two entries in the result share an identifier.
///
/// # Errors
/// Returns `400 Bad Request` if `familyName` is missing or empty.
#[axum::debug_handler]
pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchRes>, ApiError> {
    let pattern = params.family_name.unwrap_or_default();
    let clients = state.queries.search(&pattern).await?;
    Ok(Json(SearchRes { clients }))
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body = Object,
    responses(
        (status = 201, description = "Client created", body = ClientRecord),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new client
///
/// The request body is stored as-is, without field validation, and returned
/// merged with the store-assigned identifier.
#[axum::debug_handler]
pub async fn create_client(
    State(state): State<AppState>,
    Json(doc): Json<Document>,
) -> Result<(StatusCode, Json<ClientRecord>), ApiError> {
    let record = state.mutations.create(doc).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/clients/{client_id}",
    request_body = Object,
    params(("client_id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client updated", body = MessageRes),
        (status = 400, description = "Malformed client id", body = ErrorRes),
        (status = 404, description = "Client not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Update a client
///
/// Partial merge-overwrite: top-level fields present in the body replace the
/// stored values; everything else is untouched.
#[axum::debug_handler]
pub async fn update_client(
    State(state): State<AppState>,
    AxumPath(client_id): AxumPath<String>,
    Json(changes): Json<Document>,
) -> Result<Json<MessageRes>, ApiError> {
    state.mutations.update(&client_id, changes).await?;
    Ok(Json(MessageRes {
        message: "client updated".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/clients/{client_id}",
    params(("client_id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client deleted", body = MessageRes),
        (status = 400, description = "Malformed client id", body = ErrorRes),
        (status = 404, description = "Client not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a client
///
/// Cascades first: every relation record referencing the client on either
/// side is removed before the client document itself. The cleanup runs even
/// when the client is already absent, in which case the response is 404.
#[axum::debug_handler]
pub async fn delete_client(
    State(state): State<AppState>,
    AxumPath(client_id): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.mutations.delete(&client_id).await?;
    Ok(Json(MessageRes {
        message: "client deleted".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/clients/{client_id}/family",
    params(("client_id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client family summary", body = ClientFamily),
        (status = 400, description = "Malformed client id", body = ErrorRes),
        (status = 404, description = "Client not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch a client's family
///
/// Returns the client's id and full name with resolved relatives under the
/// `familyMembers` key.
#[axum::debug_handler]
pub async fn get_client_family(
    State(state): State<AppState>,
    AxumPath(client_id): AxumPath<String>,
) -> Result<Json<ClientFamily>, ApiError> {
    let family = state.queries.family(&client_id).await?;
    Ok(Json(family))
}

#[utoipa::path(
    post,
    path = "/clients/{client_id}/relatives",
    request_body = RelativeReq,
    params(("client_id" = String, Path, description = "Client identifier")),
    responses(
        (status = 201, description = "Relation added", body = MessageRes),
        (status = 400, description = "Malformed ids or missing relationship", body = ErrorRes),
        (status = 404, description = "Client or relative not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Add a relative
///
/// Inserts one directed relation record between two existing clients.
/// Duplicate relations between the same pair are allowed.
#[axum::debug_handler]
pub async fn add_relative(
    State(state): State<AppState>,
    AxumPath(client_id): AxumPath<String>,
    Json(req): Json<RelativeReq>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let relative_id = req.relative_id.unwrap_or_default();
    let relationship = req.relationship.unwrap_or_default();
    state
        .relations
        .add(&client_id, &relative_id, &relationship)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes {
            message: "relative added".into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/clients/{client_id}/relatives",
    request_body = RelativeReq,
    params(("client_id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Relationship replaced", body = MessageRes),
        (status = 400, description = "Malformed ids or missing relationship", body = ErrorRes),
        (status = 404, description = "Client or relative not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Replace a client's relationship
///
/// Destructive replace: every relation record owned by the client is deleted
/// before the single new record is inserted, leaving the client with at most
/// one outgoing relation.
#[axum::debug_handler]
pub async fn update_relative(
    State(state): State<AppState>,
    AxumPath(client_id): AxumPath<String>,
    Json(req): Json<RelativeReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let relative_id = req.relative_id.unwrap_or_default();
    let relationship = req.relationship.unwrap_or_default();
    state
        .relations
        .replace(&client_id, &relative_id, &relationship)
        .await?;
    Ok(Json(MessageRes {
        message: "relative updated".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/clients/{client_id}/relatives/{relative_id}",
    params(
        ("client_id" = String, Path, description = "Client identifier"),
        ("relative_id" = String, Path, description = "Relative identifier")
    ),
    responses(
        (status = 200, description = "Relation deleted", body = MessageRes),
        (status = 400, description = "Malformed ids", body = ErrorRes),
        (status = 404, description = "Relation not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a relation
///
/// Removes the one relation record matching both identifiers exactly.
#[axum::debug_handler]
pub async fn delete_relative(
    State(state): State<AppState>,
    AxumPath((client_id, relative_id)): AxumPath<(String, String)>,
) -> Result<Json<MessageRes>, ApiError> {
    state.relations.remove(&client_id, &relative_id).await?;
    Ok(Json(MessageRes {
        message: "relative deleted".into(),
    }))
}
