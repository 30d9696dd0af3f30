//! [`SqliteConnector`] and [`SqliteConnection`] are the SQLite implementation
//! of the folio store traits.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use folio_core::{
  NewSubmission, Submission,
  store::{CONTACTS_TABLE, ContactConnection, Connector},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{Error, Result, encode::RawSubmission, schema::SCHEMA};

// ─── Connector ───────────────────────────────────────────────────────────────

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens connections to a single SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
  path: PathBuf,
}

impl SqliteConnector {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self { path: path.as_ref().to_path_buf() }
  }
}

impl Connector for SqliteConnector {
  type Connection = SqliteConnection;
  type Error = Error;

  fn target(&self) -> String { format!("sqlite://{}", self.path.display()) }

  async fn connect(&self) -> Result<SqliteConnection> {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;
    conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
      })
      .await?;
    debug!(path = %self.path.display(), "opened sqlite connection");
    Ok(SqliteConnection { conn })
  }
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// One open SQLite connection.
pub struct SqliteConnection {
  conn: tokio_rusqlite::Connection,
}

impl ContactConnection for SqliteConnection {
  type Error = Error;

  async fn table_exists(&mut self) -> Result<bool> {
    let present = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
              rusqlite::params![CONTACTS_TABLE],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(present)
  }

  async fn create_table(&mut self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert<'a>(&'a mut self, submission: &'a NewSubmission) -> Result<i64> {
    let name    = submission.name.clone();
    let email   = submission.email.clone();
    let phone   = submission.phone.clone();
    let message = submission.message.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (name, email, phone, message) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name, email, phone, message],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn count(&mut self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?))
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn list_tables(&mut self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;
    Ok(names)
  }

  async fn recent(&mut self, limit: usize) -> Result<Vec<Submission>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, email, phone, message, created_at
           FROM contacts ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await.map_err(Error::from)
  }
}
