//! Health and diagnostics reports.

use serde::Serialize;
use tracing::warn;

use crate::{
  connect::{RetryPolicy, acquire},
  error::ConnectionError,
  form::Submission,
  store::{ContactConnection, Connector},
};

/// Database half of the `/health` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseHealth {
  /// `"connected"` or `"error"`.
  pub status:  &'static str,
  pub message: String,
  /// Row count, when the store answered.
  pub records: Option<u64>,
}

impl DatabaseHealth {
  pub fn is_connected(&self) -> bool { self.status == "connected" }

  fn error(message: impl Into<String>) -> Self {
    Self {
      status:  "error",
      message: message.into(),
      records: None,
    }
  }
}

/// Probe the store with a single connection attempt and a row count.
///
/// Never fails: problems are folded into the report. Driver messages go to
/// the log, not into the report.
pub async fn check_health<C: Connector>(connector: &C) -> DatabaseHealth {
  let mut conn = match acquire(connector, &RetryPolicy::once()).await {
    Ok(conn) => conn,
    Err(e) => return DatabaseHealth::error(e.to_string()),
  };

  let counted = conn.count().await;
  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close database connection");
  }

  match counted {
    Ok(records) => DatabaseHealth {
      status:  "connected",
      message: "database reachable".to_owned(),
      records: Some(records),
    },
    Err(e) => {
      warn!(error = %e, "health check row count failed");
      DatabaseHealth::error("database reachable but the contacts table could not be read")
    }
  }
}

/// The diagnostic dump: user tables and the newest rows.
#[derive(Debug, Clone)]
pub struct Diagnostics {
  pub tables: Vec<String>,
  pub recent: Vec<Submission>,
}

/// Error from [`diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
  #[error(transparent)]
  Unavailable(#[from] ConnectionError),

  #[error("diagnostic query failed: {0}")]
  Query(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// List tables and up to `limit` most recent submissions, newest first.
pub async fn diagnostics<C: Connector>(
  connector: &C,
  policy:    &RetryPolicy,
  limit:     usize,
) -> Result<Diagnostics, DiagnosticsError> {
  let mut conn = acquire(connector, policy).await?;

  let gathered = async {
    let tables = conn.list_tables().await?;
    let recent = conn.recent(limit).await?;
    Ok::<_, C::Error>(Diagnostics { tables, recent })
  }
  .await;

  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close database connection");
  }
  gathered.map_err(|e| DiagnosticsError::Query(Box::new(e)))
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::{
    fake::{FakeConnector, FakeNotifier},
    submit::submit,
  };

  #[tokio::test]
  async fn healthy_store_reports_row_count() {
    let store = FakeConnector::healthy();
    let body = br#"{"name":"Alice","email":"a@b.com","message":"hi"}"#;
    submit::<_, FakeNotifier>(&store, &RetryPolicy::once(), None, body).await.unwrap();

    let report = check_health(&store).await;
    assert!(report.is_connected());
    assert_eq!(report.records, Some(1));
  }

  #[tokio::test]
  async fn unreachable_store_reports_error_without_retrying() {
    let store = FakeConnector::unreachable();

    let report = check_health(&store).await;

    assert_eq!(report.status, "error");
    assert_eq!(report.records, None);
    assert!(!report.message.contains("refused"));
    assert_eq!(store.attempts(), 1);
  }

  #[tokio::test]
  async fn diagnostics_lists_newest_first_and_respects_limit() {
    let store = FakeConnector::healthy();
    let policy = RetryPolicy::new(1, Duration::ZERO);
    for name in ["a", "b", "c"] {
      let body = format!(r#"{{"name":"{name}","email":"x@y.z","message":"m"}}"#);
      submit::<_, FakeNotifier>(&store, &policy, None, body.as_bytes()).await.unwrap();
    }

    let dump = diagnostics(&store, &policy, 2).await.unwrap();

    assert_eq!(dump.tables, vec!["contacts".to_owned()]);
    let names: Vec<_> = dump.recent.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["c", "b"]);
    assert_eq!(store.open_connections(), 0);
  }
}
