//! SMTP notification for new contact submissions.
//!
//! Implements [`folio_core::Notifier`] on top of `lettre`'s async SMTP
//! transport. Sending is best-effort: the caller records a failure next to
//! the stored submission and moves on.

mod message;
mod smtp;

pub mod error;

pub use error::{Error, Result};
pub use smtp::{MailSettings, SmtpNotifier};
