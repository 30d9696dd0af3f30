//! The `Connector` and `ContactConnection` traits.
//!
//! Storage backends (`folio-store-sqlite`, `folio-store-mysql`) implement
//! these. Every request opens its own connection through a [`Connector`] and
//! closes it when done; there is no pooling contract.

use std::future::Future;

use crate::form::{NewSubmission, Submission};

/// Name of the single table this service owns.
pub const CONTACTS_TABLE: &str = "contacts";

/// Opens fresh connections to the relational store.
///
/// A connector holds resolved connection parameters only. It is shared by
/// every request, so it must be cheap to borrow from many tasks at once.
pub trait Connector: Send + Sync {
  type Connection: ContactConnection<Error = Self::Error>;
  type Error: std::error::Error + Send + Sync + 'static;

  /// A human-readable description of the target, e.g. `mysql://db:3306/portfolio`.
  /// Must not include credentials.
  fn target(&self) -> String;

  /// Make one connection attempt. Retrying is the caller's job.
  fn connect(
    &self,
  ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send + '_;
}

/// A live, exclusively-owned connection.
pub trait ContactConnection: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether the `contacts` table exists in the connected database.
  fn table_exists(
    &mut self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// `CREATE TABLE IF NOT EXISTS contacts (...)`.
  fn create_table(
    &mut self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert one row and return the generated id. `created_at` is defaulted
  /// by the store.
  fn insert<'a>(
    &'a mut self,
    submission: &'a NewSubmission,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Number of rows in `contacts`.
  fn count(&mut self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Names of all user tables, sorted.
  fn list_tables(
    &mut self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Up to `limit` rows, newest first.
  fn recent(
    &mut self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + '_;

  /// Release the connection.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
