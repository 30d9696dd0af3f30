//! SQLite backend for the folio contact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each [`SqliteConnector::connect`]
//! opens a brand-new connection on the database file.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteConnection, SqliteConnector};

#[cfg(test)]
mod tests;
