//! Error type for `garage-store-sqlite`.

use garage_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  /// `true` when SQLite rejected a write on a UNIQUE, FOREIGN KEY, NOT NULL
  /// or CHECK constraint.
  fn is_constraint_violation(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => e.code == rusqlite::ErrorCode::ConstraintViolation,
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
