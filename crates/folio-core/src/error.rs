//! Error types for `folio-core`.

use thiserror::Error;

/// A submission that cannot be accepted as sent. Always user-correctable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("no data provided")]
  NoData,

  #[error("name required")]
  NameRequired,

  #[error("valid email required")]
  EmailInvalid,

  #[error("message required")]
  MessageRequired,
}

/// The store stayed unreachable for the whole retry budget.
///
/// The display text names the attempt count only; the driver failure is kept
/// as the error source so it can be logged without reaching clients.
#[derive(Debug, Error)]
#[error("could not connect to the database after {attempts} attempt(s)")]
pub struct ConnectionError {
  pub attempts: u32,
  #[source]
  pub source:   Box<dyn std::error::Error + Send + Sync>,
}

/// Failure of the submission workflow, one variant per HTTP outcome.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Unavailable(#[from] ConnectionError),

  #[error("failed to persist submission: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}
