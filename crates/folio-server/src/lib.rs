//! Process wiring for the folio contact backend: settings, the middleware
//! stack, startup preparation and shutdown.

pub mod app;
pub mod settings;
pub mod shutdown;
pub mod startup;

pub use app::app;
pub use settings::{ConfigurationError, DatabaseSettings, Settings};
pub use shutdown::shutdown_signal;
pub use startup::prepare_store;
