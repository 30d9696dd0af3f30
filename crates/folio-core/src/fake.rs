//! In-memory connector and notifier for unit tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;

use crate::{
  form::{NewSubmission, Submission},
  notify::Notifier,
  store::{CONTACTS_TABLE, ContactConnection, Connector},
};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

#[derive(Default)]
struct Shared {
  attempts:          u32,
  failures_left:     Option<u32>,
  table_present:     bool,
  rows:              Vec<Submission>,
  reject_inserts:    bool,
  open_connections:  u32,
}

/// A store whose connection behaviour is scripted per test.
#[derive(Clone)]
pub struct FakeConnector {
  shared: Arc<Mutex<Shared>>,
}

impl FakeConnector {
  pub fn healthy() -> Self { Self::failing_first(0) }

  /// Fail the first `n` connection attempts, then succeed.
  pub fn failing_first(n: u32) -> Self {
    Self {
      shared: Arc::new(Mutex::new(Shared {
        failures_left: Some(n),
        table_present: true,
        ..Default::default()
      })),
    }
  }

  /// Never accept a connection.
  pub fn unreachable() -> Self {
    Self {
      shared: Arc::new(Mutex::new(Shared {
        failures_left: None,
        ..Default::default()
      })),
    }
  }

  pub fn without_table(self) -> Self {
    self.shared.lock().unwrap().table_present = false;
    self
  }

  pub fn rejecting_inserts(self) -> Self {
    self.shared.lock().unwrap().reject_inserts = true;
    self
  }

  pub fn attempts(&self) -> u32 { self.shared.lock().unwrap().attempts }

  pub fn table_present(&self) -> bool { self.shared.lock().unwrap().table_present }

  pub fn rows(&self) -> Vec<Submission> { self.shared.lock().unwrap().rows.clone() }

  /// Connections handed out and not yet closed.
  pub fn open_connections(&self) -> u32 {
    self.shared.lock().unwrap().open_connections
  }
}

impl Connector for FakeConnector {
  type Connection = FakeConnection;
  type Error = FakeError;

  fn target(&self) -> String { "fake://contacts".to_owned() }

  async fn connect(&self) -> Result<FakeConnection, FakeError> {
    let mut shared = self.shared.lock().unwrap();
    shared.attempts += 1;
    match shared.failures_left {
      None => return Err(FakeError("connection refused".into())),
      Some(0) => {}
      Some(ref mut n) => {
        *n -= 1;
        return Err(FakeError("connection refused".into()));
      }
    }
    shared.open_connections += 1;
    Ok(FakeConnection {
      shared: self.shared.clone(),
    })
  }
}

pub struct FakeConnection {
  shared: Arc<Mutex<Shared>>,
}

impl ContactConnection for FakeConnection {
  type Error = FakeError;

  async fn table_exists(&mut self) -> Result<bool, FakeError> {
    Ok(self.shared.lock().unwrap().table_present)
  }

  async fn create_table(&mut self) -> Result<(), FakeError> {
    self.shared.lock().unwrap().table_present = true;
    Ok(())
  }

  async fn insert<'a>(&'a mut self, submission: &'a NewSubmission) -> Result<i64, FakeError> {
    let mut shared = self.shared.lock().unwrap();
    if shared.reject_inserts || !shared.table_present {
      return Err(FakeError(format!("table {CONTACTS_TABLE} rejected the insert")));
    }
    let id = shared.rows.len() as i64 + 1;
    shared.rows.push(submission.clone().persisted(id, Utc::now()));
    Ok(id)
  }

  async fn count(&mut self) -> Result<u64, FakeError> {
    Ok(self.shared.lock().unwrap().rows.len() as u64)
  }

  async fn list_tables(&mut self) -> Result<Vec<String>, FakeError> {
    let present = self.shared.lock().unwrap().table_present;
    Ok(if present { vec![CONTACTS_TABLE.to_owned()] } else { Vec::new() })
  }

  async fn recent(&mut self, limit: usize) -> Result<Vec<Submission>, FakeError> {
    let shared = self.shared.lock().unwrap();
    Ok(shared.rows.iter().rev().take(limit).cloned().collect())
  }

  async fn close(self) -> Result<(), FakeError> {
    self.shared.lock().unwrap().open_connections -= 1;
    Ok(())
  }
}

/// Records every submission it is asked to relay; optionally fails.
#[derive(Clone, Default)]
pub struct FakeNotifier {
  pub fail: bool,
  sent:     Arc<Mutex<Vec<i64>>>,
}

impl FakeNotifier {
  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Default::default()
    }
  }

  pub fn sent(&self) -> Vec<i64> { self.sent.lock().unwrap().clone() }
}

impl Notifier for FakeNotifier {
  type Error = FakeError;

  async fn notify<'a>(&'a self, submission: &'a Submission) -> Result<(), FakeError> {
    if self.fail {
      return Err(FakeError("smtp login rejected".into()));
    }
    self.sent.lock().unwrap().push(submission.id);
    Ok(())
  }
}
