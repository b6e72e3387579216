//! Error types for `garage-core`.
//!
//! Every service operation fails with one of three caller-facing kinds:
//! [`Error::Validation`], [`Error::NotFound`], or an internal failure
//! ([`Error::Internal`] / [`Error::Store`]).

use thiserror::Error;
use tracing::warn;

use crate::store::StoreError;

/// Reported when a write collides with a unique key or a missing reference
/// that the service-level checks did not catch.
pub const CONFLICT_MESSAGE: &str = "The provided data conflicts with an existing record.";

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or conflicting input: duplicate unique field, missing
  /// referenced entity, unparseable date/time, blocked delete.
  #[error("{0}")]
  Validation(String),

  /// The requested entity does not exist.
  #[error("{0}")]
  NotFound(String),

  /// A persistence failure that an operation reports with a fixed message.
  #[error("{0}")]
  Internal(String),

  /// Any other failure raised by the store backend.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Classify a backend error. Constraint violations that slipped past the
  /// application-level checks become [`Error::Validation`] with a fixed
  /// message; the backend text is only logged.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_constraint_violation() {
      warn!(error = %e, "store rejected write on a constraint");
      Self::Validation(CONFLICT_MESSAGE.to_owned())
    } else {
      Self::Store(Box::new(e))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
