//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Maps the core taxonomy onto HTTP statuses: not-found → 404, validation →
//! 422, edit conflict → 409, storage → 500. Storage details are logged, not
//! leaked to the client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolodex_core::error::Violations;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthenticated,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("validation failed: {0}")]
  Validation(Violations),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rolodex_core::Error> for ApiError {
  fn from(e: rolodex_core::Error) -> Self {
    use rolodex_core::Error as E;
    match e {
      E::ContactNotFound(id) => Self::NotFound(format!("contact {id} not found")),
      E::CategoryNotFound(id) => {
        Self::NotFound(format!("category {id} not found"))
      }
      E::Validation(violations) => Self::Validation(violations),
      E::EditConflict { entity, id } => {
        Self::Conflict(format!("{entity} {id} was modified by another caller"))
      }
      E::Storage(source) => Self::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, json!({ "error": "authentication required" }))
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Validation(violations) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": "validation failed", "violations": violations }),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "internal error" }))
      }
    };
    (status, Json(body)).into_response()
  }
}
