//! Mapping from core errors to HTTP responses.
//!
//! Taxonomy: validation failures → 400, missing entities/relations → 404,
//! anything from the persistence layer → 500 with the underlying message
//! surfaced in the body. No retries anywhere; storage failures propagate
//! immediately to the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use casebook_core::CoreError;

use crate::dto::ErrorRes;

pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            CoreError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    message: message.clone(),
                    error: None,
                },
            ),
            CoreError::ClientNotFound => (
                StatusCode::NOT_FOUND,
                ErrorRes {
                    message: "client not found".into(),
                    error: None,
                },
            ),
            CoreError::RelationNotFound => (
                StatusCode::NOT_FOUND,
                ErrorRes {
                    message: "relation not found".into(),
                    error: None,
                },
            ),
            err => {
                tracing::error!("storage error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes {
                        message: "internal storage error".into(),
                        error: Some(err.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
