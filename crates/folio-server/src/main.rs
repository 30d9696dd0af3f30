//! folio-server binary.
//!
//! Loads `.env` when present, reads `folio.toml` (or the path given with
//! `--config`) and the environment, prepares the store, and serves the
//! contact API until Ctrl-C or SIGTERM.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use folio_api::AppState;
use folio_core::store::Connector;
use folio_mail::SmtpNotifier;
use folio_server::{
  DatabaseSettings, Settings, prepare_store, shutdown_signal,
  startup::prepare_store_until_ready,
};
use folio_store_mysql::MySqlConnector;
use folio_store_sqlite::SqliteConnector;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

/// Pause between background attempts to prepare a store that was down at
/// startup.
const STORE_RECHECK_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(author, version, about = "Portfolio contact form backend")]
struct Cli {
  /// Path to an optional TOML settings file. Environment variables win.
  #[arg(short, long, default_value = "folio.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // A missing .env file is normal.
  let dotenv = dotenvy::dotenv();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  if let Ok(path) = &dotenv {
    info!(path = %path.display(), "loaded environment file");
  }

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config).context("invalid configuration")?;
  info!(
    driver = settings.database.driver(),
    attempts = settings.retry.max_attempts,
    mail = settings.mail.is_configured(),
    diagnostics = settings.diagnostics_enabled,
    "settings resolved"
  );

  match &settings.database {
    DatabaseSettings::MySql(params) => {
      let connector = MySqlConnector::new(params).context("failed to configure mysql")?;
      serve(connector, &settings).await
    }
    DatabaseSettings::Sqlite(path) => serve(SqliteConnector::new(path), &settings).await,
  }
}

async fn serve<C: Connector + 'static>(connector: C, settings: &Settings) -> anyhow::Result<()> {
  info!(endpoint = %connector.target(), "using database");
  let connector = Arc::new(connector);
  if !prepare_store(connector.as_ref(), &settings.retry).await {
    let connector = Arc::clone(&connector);
    let policy = settings.retry;
    tokio::spawn(async move {
      prepare_store_until_ready(connector.as_ref(), &policy, STORE_RECHECK_INTERVAL).await;
    });
  }

  let notifier = if settings.mail.is_configured() {
    match SmtpNotifier::new(&settings.mail) {
      Ok(notifier) => {
        info!(to = %notifier.recipient(), "email notifications enabled");
        Some(Arc::new(notifier))
      }
      Err(e) => {
        warn!(error = %e, "email notifications disabled: bad mail settings");
        None
      }
    }
  } else {
    info!("email notifications disabled: SMTP credentials not set");
    None
  };

  let state = AppState {
    connector,
    notifier,
    retry:               settings.retry,
    diagnostics_enabled: settings.diagnostics_enabled,
  };
  let app = folio_server::app(state, &settings.allowed_origins);

  let address = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  info!("server stopped");
  Ok(())
}
