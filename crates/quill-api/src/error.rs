//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quill_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Authorization failures on edits
/// never appear here — they are absorbed fail-soft inside the handlers.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No (or unresolvable) identity on a route that requires one.
  #[error("authentication required")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  /// Lift a store-backend error across the trait boundary.
  pub fn from_store<E: Into<CoreError>>(e: E) -> Self { Self::Core(e.into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "authentication required" })),
      )
        .into_response(),

      ApiError::Core(e) => {
        let status = match &e {
          CoreError::PostNotFound(_)
          | CoreError::GroupNotFound(_)
          | CoreError::UserNotFound(_) => StatusCode::NOT_FOUND,
          CoreError::EmptyText { .. } | CoreError::ForbiddenWord(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
          }
          CoreError::UsernameTaken(_) | CoreError::SlugTaken(_) => {
            StatusCode::CONFLICT
          }
          CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &e {
          CoreError::EmptyText { field } => {
            json!({ "error": e.to_string(), "field": field })
          }
          CoreError::ForbiddenWord(_) => {
            json!({ "error": e.to_string(), "field": "text" })
          }
          other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
      }
    }
  }
}
