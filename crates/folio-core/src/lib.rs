//! Core types and workflows for the folio contact backend.
//!
//! This crate knows nothing about HTTP, SQL dialects, or SMTP. Storage
//! backends implement [`store::Connector`], mailers implement
//! [`notify::Notifier`], and the API layer drives the workflows in
//! [`connect`], [`submit`] and [`health`].

// Native `async fn` in traits; the trait signatures spell out `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod connect;
pub mod error;
pub mod form;
pub mod health;
pub mod notify;
pub mod params;
pub mod store;
pub mod submit;

#[cfg(test)]
mod fake;

pub use connect::{RetryPolicy, acquire, ensure_table};
pub use error::{ConnectionError, SubmitError, ValidationError};
pub use form::{ContactForm, NewSubmission, Submission};
pub use health::{DatabaseHealth, Diagnostics, DiagnosticsError, check_health, diagnostics};
pub use notify::{NotifyOutcome, Notifier};
pub use params::ConnectionParams;
pub use store::{ContactConnection, Connector};
pub use submit::{Receipt, submit};
