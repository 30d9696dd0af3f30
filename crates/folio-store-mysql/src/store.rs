//! [`MySqlConnector`] and [`MySqlConnection`] are the MySQL implementation of
//! the folio store traits.

use std::time::Duration;

use chrono::{DateTime, Utc};
use folio_core::{
  ConnectionParams, NewSubmission, Submission,
  store::{CONTACTS_TABLE, ContactConnection, Connector},
};
use sqlx::{Connection as _, Row as _, mysql::MySqlConnectOptions};
use tracing::debug;

use crate::{Error, Result, schema};

// ─── Connector ───────────────────────────────────────────────────────────────

/// Opens connections to one MySQL server and schema.
///
/// Not `Debug`: the connect options hold the password.
#[derive(Clone)]
pub struct MySqlConnector {
  options: MySqlConnectOptions,
  target:  String,
  timeout: Duration,
}

impl MySqlConnector {
  /// Build connect options from resolved parameters. A user is mandatory;
  /// there is no fallback account.
  pub fn new(params: &ConnectionParams) -> Result<Self> {
    let user = params
      .user
      .as_deref()
      .filter(|u| !u.is_empty())
      .ok_or(Error::MissingUser)?;

    let mut options = MySqlConnectOptions::new()
      .host(&params.host)
      .port(params.port)
      .username(user)
      .database(&params.database);
    if let Some(password) = params.password.as_deref() {
      options = options.password(password);
    }

    Ok(Self {
      options,
      target: format!("mysql://{}:{}/{}", params.host, params.port, params.database),
      timeout: params.timeout,
    })
  }
}

impl Connector for MySqlConnector {
  type Connection = MySqlConnection;
  type Error = Error;

  fn target(&self) -> String { self.target.clone() }

  async fn connect(&self) -> Result<MySqlConnection> {
    let conn = tokio::time::timeout(
      self.timeout,
      sqlx::MySqlConnection::connect_with(&self.options),
    )
    .await
    .map_err(|_| Error::Timeout(self.timeout))??;
    debug!(db = %self.target, "opened mysql connection");
    Ok(MySqlConnection { conn })
  }
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// One open MySQL connection.
pub struct MySqlConnection {
  conn: sqlx::MySqlConnection,
}

impl ContactConnection for MySqlConnection {
  type Error = Error;

  async fn table_exists(&mut self) -> Result<bool> {
    let n: i64 = sqlx::query_scalar(schema::TABLE_EXISTS)
      .bind(CONTACTS_TABLE)
      .fetch_one(&mut self.conn)
      .await?;
    Ok(n > 0)
  }

  async fn create_table(&mut self) -> Result<()> {
    sqlx::query(schema::CREATE_CONTACTS)
      .execute(&mut self.conn)
      .await?;
    Ok(())
  }

  async fn insert<'a>(&'a mut self, submission: &'a NewSubmission) -> Result<i64> {
    let done = sqlx::query(schema::INSERT_CONTACT)
      .bind(&submission.name)
      .bind(&submission.email)
      .bind(&submission.phone)
      .bind(&submission.message)
      .execute(&mut self.conn)
      .await?;
    Ok(done.last_insert_id() as i64)
  }

  async fn count(&mut self) -> Result<u64> {
    let n: i64 = sqlx::query_scalar(schema::COUNT_CONTACTS)
      .fetch_one(&mut self.conn)
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn list_tables(&mut self) -> Result<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(schema::LIST_TABLES)
      .fetch_all(&mut self.conn)
      .await?;
    Ok(names)
  }

  async fn recent(&mut self, limit: usize) -> Result<Vec<Submission>> {
    let limit = u64::try_from(limit).unwrap_or(u64::MAX);
    let rows = sqlx::query(schema::RECENT_CONTACTS)
      .bind(limit)
      .fetch_all(&mut self.conn)
      .await?;

    rows
      .into_iter()
      .map(|row| -> Result<Submission> {
        let phone: Option<String> = row.try_get("phone")?;
        let created_at: Option<DateTime<Utc>> = row.try_get("created_at")?;
        Ok(Submission {
          id:         row.try_get("id")?,
          name:       row.try_get("name")?,
          email:      row.try_get("email")?,
          phone:      phone.unwrap_or_default(),
          message:    row.try_get("message")?,
          created_at: created_at.unwrap_or_default(),
        })
      })
      .collect()
  }

  async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}
