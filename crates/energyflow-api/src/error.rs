//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use energyflow_core::{store::StoreError, validate::ValidationError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(ValidationError),

  #[error("{0}")]
  StockExceeded(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: rejected requests keep their domain meaning,
  /// everything else is a store fault.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.as_core().and_then(Self::from_domain) {
      Some(mapped) => mapped,
      None => Self::Store(Box::new(e)),
    }
  }

  fn from_domain(e: &energyflow_core::Error) -> Option<Self> {
    use energyflow_core::Error as E;
    match e {
      E::Validation(v) => Some(Self::Validation(v.clone())),
      E::NotFound { kind, id } => Some(Self::NotFound(format!("{kind} {id:?} not found"))),
      E::StockExceeded { .. } => Some(Self::StockExceeded(e.to_string())),
      _ => None,
    }
  }
}

impl From<energyflow_core::Error> for ApiError {
  fn from(e: energyflow_core::Error) -> Self {
    Self::from_domain(&e).unwrap_or_else(|| Self::Store(Box::new(e)))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation(v) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": self.to_string(), "fields": v.fields }),
      ),
      ApiError::StockExceeded(m) => {
        (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": m }))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
