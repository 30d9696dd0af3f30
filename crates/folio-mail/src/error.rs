//! Error type for `folio-mail`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid mail address: {0}")]
  Address(#[from] lettre::address::AddressError),

  #[error("could not build message: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),

  #[error("mail credentials are not configured")]
  NotConfigured,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
