//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error leaves as `{"status":"error","message":...}`. Server-side
//! failures carry a fixed message; the underlying cause is only logged.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::{ConnectionError, DiagnosticsError, SubmitError, ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const UNAVAILABLE_MESSAGE: &str =
  "The database is temporarily unavailable. Please try again later.";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Unavailable(#[from] ConnectionError),

  #[error("not found")]
  NotFound,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<SubmitError> for ApiError {
  fn from(e: SubmitError) -> Self {
    match e {
      SubmitError::Validation(v) => ApiError::Validation(v),
      SubmitError::Unavailable(c) => ApiError::Unavailable(c),
      SubmitError::Persistence(source) => ApiError::Internal(source),
    }
  }
}

impl From<DiagnosticsError> for ApiError {
  fn from(e: DiagnosticsError) -> Self {
    match e {
      DiagnosticsError::Unavailable(c) => ApiError::Unavailable(c),
      DiagnosticsError::Query(source) => ApiError::Internal(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
      ApiError::Unavailable(e) => {
        error!(attempts = e.attempts, cause = %e.source, "database unavailable");
        error_response(StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE)
      }
      ApiError::NotFound => error_response(StatusCode::NOT_FOUND, "Not found"),
      ApiError::Internal(e) => {
        error!(error = %e, "request failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
      }
    }
  }
}

/// The stable error body, also used by the server's panic boundary.
pub fn error_response(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "status": "error", "message": message }))).into_response()
}
