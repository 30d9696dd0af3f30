//! MySQL backend for the folio contact store.
//!
//! Uses a plain [`sqlx::MySqlConnection`] per request rather than a pool;
//! the retry policy lives in `folio-core`.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{MySqlConnection, MySqlConnector};
