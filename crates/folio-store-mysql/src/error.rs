//! Error type for `folio-store-mysql`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("connection attempt timed out after {0:?}")]
  Timeout(Duration),

  #[error("a database user is required for mysql")]
  MissingUser,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
