//! Integration tests for the SQLite backend against a temporary database file.

use std::time::Duration;

use folio_core::{
  ContactForm, NewSubmission, RetryPolicy, acquire, ensure_table,
  store::{ContactConnection, Connector},
};
use tempfile::TempDir;

use crate::SqliteConnector;

fn connector() -> (TempDir, SqliteConnector) {
  let dir = tempfile::tempdir().expect("temp dir");
  let connector = SqliteConnector::new(dir.path().join("contacts.db"));
  (dir, connector)
}

fn alice() -> NewSubmission {
  ContactForm {
    name:    Some("Alice".into()),
    email:   Some("a@b.com".into()),
    phone:   Some(String::new()),
    message: Some("hi".into()),
  }
  .validate()
  .unwrap()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_database_has_no_table_until_ensured() {
  let (_dir, c) = connector();
  let mut conn = c.connect().await.unwrap();

  assert!(!conn.table_exists().await.unwrap());
  assert!(ensure_table(&mut conn).await.unwrap());
  assert!(conn.table_exists().await.unwrap());
  assert!(!ensure_table(&mut conn).await.unwrap());

  conn.close().await.unwrap();
}

#[tokio::test]
async fn list_tables_hides_sqlite_internals() {
  let (_dir, c) = connector();
  let mut conn = c.connect().await.unwrap();
  conn.create_table().await.unwrap();

  // AUTOINCREMENT creates `sqlite_sequence`; it must not be listed.
  conn.insert(&alice()).await.unwrap();
  assert_eq!(conn.list_tables().await.unwrap(), vec!["contacts".to_owned()]);
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_returns_increasing_ids() {
  let (_dir, c) = connector();
  let mut conn = c.connect().await.unwrap();
  conn.create_table().await.unwrap();

  let first = conn.insert(&alice()).await.unwrap();
  let second = conn.insert(&alice()).await.unwrap();

  assert!(first > 0);
  assert!(second > first);
  assert_eq!(conn.count().await.unwrap(), 2);
}

#[tokio::test]
async fn rows_survive_across_connections() {
  let (_dir, c) = connector();

  let mut conn = c.connect().await.unwrap();
  conn.create_table().await.unwrap();
  let id = conn.insert(&alice()).await.unwrap();
  conn.close().await.unwrap();

  let mut conn = c.connect().await.unwrap();
  let rows = conn.recent(10).await.unwrap();
  assert_eq!(rows.len(), 1);
  let row = &rows[0];
  assert_eq!(row.id, id);
  assert_eq!(row.name, "Alice");
  assert_eq!(row.email, "a@b.com");
  assert_eq!(row.phone, "");
  assert_eq!(row.message, "hi");
}

#[tokio::test]
async fn insert_without_table_fails() {
  let (_dir, c) = connector();
  let mut conn = c.connect().await.unwrap();
  assert!(conn.insert(&alice()).await.is_err());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_is_newest_first_and_limited() {
  let (_dir, c) = connector();
  let mut conn = c.connect().await.unwrap();
  conn.create_table().await.unwrap();

  let mut ids = Vec::new();
  for _ in 0..12 {
    ids.push(conn.insert(&alice()).await.unwrap());
  }

  let rows = conn.recent(10).await.unwrap();
  assert_eq!(rows.len(), 10);
  assert_eq!(rows[0].id, *ids.last().unwrap());
  assert!(rows.windows(2).all(|w| w[0].id > w[1].id));
  assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

// ─── Connecting ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_directory_is_unreachable() {
  let (dir, _) = connector();
  let c = SqliteConnector::new(dir.path().join("no/such/dir/contacts.db"));

  let err = acquire(&c, &RetryPolicy::new(2, Duration::ZERO)).await.err().unwrap();
  assert_eq!(err.attempts, 2);
}

#[test]
fn target_names_the_file() {
  let c = SqliteConnector::new("/var/lib/folio/contacts.db");
  assert_eq!(c.target(), "sqlite:///var/lib/folio/contacts.db");
}
