//! Resolved connection parameters for a networked store.

use std::{fmt, time::Duration};

/// Host, credentials and schema for one database server.
///
/// Built once at startup by the server's settings resolver and handed to the
/// backend connector; nothing reads the environment after that.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
  pub host:     String,
  pub port:     u16,
  pub user:     Option<String>,
  pub password: Option<String>,
  pub database: String,
  /// Upper bound on a single connection attempt.
  pub timeout:  Duration,
}

impl fmt::Debug for ConnectionParams {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConnectionParams")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("user", &self.user)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("database", &self.database)
      .field("timeout", &self.timeout)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn debug_output_hides_password() {
    let params = ConnectionParams {
      host:     "db.internal".into(),
      port:     3306,
      user:     Some("folio".into()),
      password: Some("hunter2".into()),
      database: "portfolio".into(),
      timeout:  Duration::from_secs(10),
    };
    let shown = format!("{params:?}");
    assert!(!shown.contains("hunter2"));
    assert!(shown.contains("<redacted>"));
  }
}
