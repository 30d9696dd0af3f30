//! Connection acquisition with a bounded, fixed-delay retry policy, and the
//! one-time table check run at startup.

use std::{
  sync::atomic::{AtomicU32, Ordering},
  time::Duration,
};

use backon::{ConstantBuilder, Retryable};
use tracing::{debug, error, info, warn};

use crate::{
  error::ConnectionError,
  store::{CONTACTS_TABLE, ContactConnection, Connector},
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// How hard [`acquire`] tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total connection attempts, including the first. Never zero.
  pub max_attempts: u32,
  /// Fixed pause between consecutive attempts.
  pub delay:        Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      delay:        Duration::from_secs(2),
    }
  }
}

impl RetryPolicy {
  pub fn new(max_attempts: u32, delay: Duration) -> Self {
    Self {
      max_attempts: max_attempts.max(1),
      delay,
    }
  }

  /// A single attempt with no retries.
  pub fn once() -> Self { Self::new(1, Duration::ZERO) }

  fn backoff(&self) -> ConstantBuilder {
    ConstantBuilder::default()
      .with_delay(self.delay)
      .with_max_times(self.max_attempts.max(1) as usize - 1)
  }
}

// ─── Acquire ─────────────────────────────────────────────────────────────────

/// Open a connection, retrying per `policy`.
///
/// The caller waits for the whole budget in the worst case. On exhaustion
/// the returned [`ConnectionError`] carries the number of attempts made and
/// the last driver failure.
pub async fn acquire<C: Connector>(
  connector: &C,
  policy:    &RetryPolicy,
) -> Result<C::Connection, ConnectionError> {
  let endpoint = connector.target();
  let attempts = AtomicU32::new(0);

  let result = {
    let endpoint = endpoint.as_str();
    let attempts = &attempts;
    let max_attempts = policy.max_attempts;

    (move || async move {
      let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
      debug!(endpoint, attempt, max_attempts, "connecting to database");
      connector.connect().await
    })
    .retry(policy.backoff())
    .notify(|err: &C::Error, delay: Duration| {
      warn!(endpoint, error = %err, ?delay, "database connection attempt failed, retrying");
    })
    .await
  };

  let attempts = attempts.into_inner();
  match result {
    Ok(conn) => {
      info!(%endpoint, attempts, "connected to database");
      Ok(conn)
    }
    Err(e) => {
      error!(%endpoint, attempts, error = %e, "giving up on database connection");
      Err(ConnectionError {
        attempts,
        source: Box::new(e),
      })
    }
  }
}

// ─── Startup table check ─────────────────────────────────────────────────────

/// Create the `contacts` table when it is missing.
///
/// Returns `true` when the table had to be created. Safe to call repeatedly;
/// the server calls it once at startup, never per request.
pub async fn ensure_table<K: ContactConnection>(conn: &mut K) -> Result<bool, K::Error> {
  if conn.table_exists().await? {
    debug!(table = CONTACTS_TABLE, "table present");
    return Ok(false);
  }
  conn.create_table().await?;
  info!(table = CONTACTS_TABLE, "created missing table");
  Ok(true)
}
