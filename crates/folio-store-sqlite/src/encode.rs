//! Decoding helpers between SQLite column text and domain types.
//!
//! `created_at` is filled in by SQLite's `CURRENT_TIMESTAMP`, which renders
//! UTC as `YYYY-MM-DD HH:MM:SS` without an offset.

use chrono::{DateTime, NaiveDateTime, Utc};
use folio_core::Submission;

use crate::{Error, Result};

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  // Rows written by hand may carry RFC 3339; accept both.
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP)
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// A `contacts` row as read from SQLite, before timestamp decoding.
pub struct RawSubmission {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub message:    String,
  pub created_at: String,
}

impl RawSubmission {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      message:    row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:         self.id,
      name:       self.name,
      email:      self.email,
      phone:      self.phone.unwrap_or_default(),
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
