//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use seatbook_core::AdmissionError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Admission(#[from] AdmissionError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Stable machine-readable kind, returned as `code` in the body.
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::Admission(e) => match e {
        AdmissionError::EventNotFound(_) => "event_not_found",
        AdmissionError::AlreadyAdmitted { .. } => "already_admitted",
        AdmissionError::CapacityExceeded { .. } => "capacity_exceeded",
        AdmissionError::EventStore(_)
        | AdmissionError::Ledger(_)
        | AdmissionError::Interrupted(_) => "internal",
      },
      ApiError::Store(_) => "internal",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Admission(e) => match e {
        AdmissionError::EventNotFound(_) => StatusCode::NOT_FOUND,
        AdmissionError::AlreadyAdmitted { .. }
        | AdmissionError::CapacityExceeded { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "code": self.code() });
    (status, Json(body)).into_response()
  }
}
