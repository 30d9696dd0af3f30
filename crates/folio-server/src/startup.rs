//! One-time store preparation before the listener binds.

use std::time::Duration;

use folio_core::{
  RetryPolicy, acquire, ensure_table,
  store::{ContactConnection, Connector},
};
use tracing::{error, info, warn};

/// Make sure the `contacts` table exists.
///
/// Returns whether the store is ready. A failure is logged and the server
/// still starts; `/health` reports the problem and each request retries.
pub async fn prepare_store<C: Connector>(connector: &C, policy: &RetryPolicy) -> bool {
  let mut conn = match acquire(connector, policy).await {
    Ok(conn) => conn,
    Err(e) => {
      error!(endpoint = %connector.target(), error = %e, "database not reachable at startup");
      return false;
    }
  };

  let ensured = ensure_table(&mut conn).await;
  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close database connection");
  }

  match ensured {
    Ok(true) => {
      info!(endpoint = %connector.target(), "created contacts table");
      true
    }
    Ok(false) => {
      info!(endpoint = %connector.target(), "contacts table present");
      true
    }
    Err(e) => {
      error!(error = %e, "could not create contacts table");
      false
    }
  }
}

/// Repeat [`prepare_store`] every `interval` until it succeeds.
///
/// Spawned by the binary when the startup attempt fails, so a store that
/// comes back later still gets its table without a restart.
pub async fn prepare_store_until_ready<C: Connector>(
  connector: &C,
  policy:    &RetryPolicy,
  interval:  Duration,
) {
  while !prepare_store(connector, policy).await {
    warn!(?interval, "store not prepared, trying again later");
    tokio::time::sleep(interval).await;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use folio_store_sqlite::SqliteConnector;

  use super::*;

  #[tokio::test]
  async fn creates_the_table_once() {
    let dir = tempfile::tempdir().unwrap();
    let connector = SqliteConnector::new(dir.path().join("contacts.db"));
    let policy = RetryPolicy::new(1, Duration::ZERO);

    assert!(prepare_store(&connector, &policy).await);
    assert!(prepare_store(&connector, &policy).await);

    let mut conn = connector.connect().await.unwrap();
    assert!(conn.table_exists().await.unwrap());
  }

  #[tokio::test]
  async fn unreachable_store_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let connector = SqliteConnector::new(dir.path().join("missing/contacts.db"));
    assert!(!prepare_store(&connector, &RetryPolicy::new(2, Duration::ZERO)).await);
  }

  #[tokio::test]
  async fn table_is_created_once_the_store_returns() {
    let dir = tempfile::tempdir().unwrap();
    let db_dir = dir.path().join("late");
    let connector = Arc::new(SqliteConnector::new(db_dir.join("contacts.db")));
    let policy = RetryPolicy::new(1, Duration::ZERO);

    let task = {
      let connector = Arc::clone(&connector);
      tokio::spawn(async move {
        prepare_store_until_ready(connector.as_ref(), &policy, Duration::from_millis(10)).await;
      })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());
    std::fs::create_dir(&db_dir).unwrap();

    tokio::time::timeout(Duration::from_secs(5), task)
      .await
      .unwrap()
      .unwrap();
    let mut conn = connector.connect().await.unwrap();
    assert!(conn.table_exists().await.unwrap());
  }
}
