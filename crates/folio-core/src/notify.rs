//! Best-effort notification of new submissions.

use std::future::Future;

use crate::form::Submission;

/// Relays a persisted submission somewhere a human will see it.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn notify<'a>(
    &'a self,
    submission: &'a Submission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// What happened to the notification for one submission.
///
/// Reported next to the persisted row; it never changes whether the
/// submission as a whole succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
  Sent,
  NotConfigured,
  Failed(String),
}

impl NotifyOutcome {
  /// The `email_notification` flag exposed to clients.
  pub fn delivered(&self) -> bool { matches!(self, Self::Sent) }
}
