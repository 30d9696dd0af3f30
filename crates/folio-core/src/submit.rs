//! The submission workflow: validate, persist, then notify.
//!
//! Persistence is the outcome that matters; the notification is advisory and
//! reported separately in [`Receipt::notification`]. A notification is only
//! ever attempted for a row that was committed.

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  connect::{RetryPolicy, acquire},
  error::SubmitError,
  form::{ContactForm, NewSubmission, Submission},
  notify::{NotifyOutcome, Notifier},
  store::{ContactConnection, Connector},
};

/// The result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
  /// The persisted row. `created_at` is the time the insert returned.
  pub submission:   Submission,
  pub notification: NotifyOutcome,
}

/// Handle one raw form body end to end.
///
/// `notifier` is `None` when no mail credentials are configured.
pub async fn submit<C, N>(
  connector: &C,
  policy:    &RetryPolicy,
  notifier:  Option<&N>,
  body:      &[u8],
) -> Result<Receipt, SubmitError>
where
  C: Connector,
  N: Notifier,
{
  let new = ContactForm::from_json(body)?.validate()?;

  let submission = persist(connector, policy, new).await?;
  info!(id = submission.id, "submission stored");

  let notification = match notifier {
    Some(notifier) => match notifier.notify(&submission).await {
      Ok(()) => {
        info!(id = submission.id, "notification sent");
        NotifyOutcome::Sent
      }
      Err(e) => {
        warn!(id = submission.id, error = %e, "notification failed; submission kept");
        NotifyOutcome::Failed(e.to_string())
      }
    },
    None => NotifyOutcome::NotConfigured,
  };

  Ok(Receipt {
    submission,
    notification,
  })
}

/// Insert on a fresh connection. The connection is closed whether or not the
/// insert succeeded.
async fn persist<C: Connector>(
  connector: &C,
  policy:    &RetryPolicy,
  new:       NewSubmission,
) -> Result<Submission, SubmitError> {
  let mut conn = acquire(connector, policy).await?;

  let inserted = conn.insert(&new).await;
  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close database connection");
  }

  let id = inserted.map_err(|e| {
    warn!(error = %e, "insert failed");
    SubmitError::Persistence(Box::new(e))
  })?;
  Ok(new.persisted(id, Utc::now()))
}
