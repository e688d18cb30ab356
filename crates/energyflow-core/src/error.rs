//! Error types for `energyflow-core`.

use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or a numeric field is not strictly positive.
  #[error("validation failed: {0}")]
  Validation(ValidationError),

  /// An update or lookup referenced an id that could not be resolved.
  #[error("{kind} not found: {id:?}")]
  NotFound { kind: &'static str, id: String },

  /// A day record tried to sell more than the opening stock plus deliveries.
  #[error("sold exceeds available stock: {sold} sold, {available} available")]
  StockExceeded { available: f64, sold: f64 },

  /// Persisted state could not be read or decoded. The store absorbs this on
  /// reads and treats the unreadable part as empty; it is surfaced only for
  /// logging.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(String),

  #[error("export error: {0}")]
  Export(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }
}

impl From<ValidationError> for Error {
  fn from(e: ValidationError) -> Self { Self::Validation(e) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
