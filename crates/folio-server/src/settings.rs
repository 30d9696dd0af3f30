//! Settings resolution.
//!
//! Values come from an optional TOML file, then the process environment
//! (after `.env` has been loaded by the binary). Every raw value is read as
//! text so that bad input is reported as a [`ConfigurationError`] naming the
//! offending variable, not as a deserializer message.
//!
//! Database precedence: a parseable `DATABASE_URL`, then the individual
//! `DB_*` variables, then defaults. There are no default credentials.

use std::{
  borrow::Cow,
  path::{Path, PathBuf},
  time::Duration,
};

use axum::http::HeaderValue;
use config::{Config, Environment, File};
use folio_core::{ConnectionParams, RetryPolicy};
use folio_mail::MailSettings;
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_DB_NAME: &str = "portfolio";
const DEFAULT_SQLITE_PATH: &str = "portfolio.db";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Invalid or missing startup configuration. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("failed to read settings: {0}")]
  Source(#[from] config::ConfigError),

  #[error("{name} must be a port between 1 and 65535, got {value:?}")]
  InvalidPort { name: &'static str, value: String },

  #[error("{name} must be a whole number, got {value:?}")]
  InvalidNumber { name: &'static str, value: String },

  #[error("{name} must be true or false, got {value:?}")]
  InvalidFlag { name: &'static str, value: String },

  #[error("DB_CONNECT_ATTEMPTS must be at least 1")]
  ZeroAttempts,

  #[error("DB_USER is required for the mysql driver")]
  MissingUser,

  #[error("unknown DB_DRIVER {0:?}, expected mysql or sqlite")]
  UnknownDriver(String),

  #[error("invalid origin in ALLOWED_ORIGINS: {0:?}")]
  InvalidOrigin(String),
}

pub type Result<T, E = ConfigurationError> = std::result::Result<T, E>;

// ─── Resolved settings ───────────────────────────────────────────────────────

/// Which backend to talk to, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
  MySql(ConnectionParams),
  /// SQLite file path. Intended for local development.
  Sqlite(PathBuf),
}

impl DatabaseSettings {
  pub fn driver(&self) -> &'static str {
    match self {
      Self::MySql(_) => "mysql",
      Self::Sqlite(_) => "sqlite",
    }
  }
}

/// Everything the server needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
  pub database:            DatabaseSettings,
  pub retry:               RetryPolicy,
  pub mail:                MailSettings,
  /// Listen port on all interfaces.
  pub port:                u16,
  pub allowed_origins:     Vec<HeaderValue>,
  pub diagnostics_enabled: bool,
}

impl Settings {
  /// Read `path` if it exists, then the process environment.
  pub fn load(path: &Path) -> Result<Self> {
    let config = Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(Environment::default())
      .build()?;
    Self::from_config(config)
  }

  /// Resolve from an already-built [`Config`].
  pub fn from_config(config: Config) -> Result<Self> {
    let raw: RawSettings = config.try_deserialize()?;
    raw.resolve()
  }
}

// ─── Raw values ──────────────────────────────────────────────────────────────

/// Settings exactly as found. Keys are the lower-cased variable names.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
  database_url:            Option<String>,
  db_driver:               Option<String>,
  db_host:                 Option<String>,
  db_port:                 Option<String>,
  db_name:                 Option<String>,
  db_user:                 Option<String>,
  db_password:             Option<String>,
  db_connect_timeout_secs: Option<String>,
  db_connect_attempts:     Option<String>,
  db_retry_delay_secs:     Option<String>,
  smtp_host:               Option<String>,
  smtp_port:               Option<String>,
  smtp_username:           Option<String>,
  smtp_password:           Option<String>,
  notify_from:             Option<String>,
  notify_to:               Option<String>,
  port:                    Option<String>,
  allowed_origins:         Option<String>,
  enable_diagnostics:      Option<String>,
}

impl RawSettings {
  fn resolve(self) -> Result<Settings> {
    let defaults = RetryPolicy::default();
    let attempts = number(
      "DB_CONNECT_ATTEMPTS",
      &self.db_connect_attempts,
      u64::from(defaults.max_attempts),
    )?;
    if attempts == 0 {
      return Err(ConfigurationError::ZeroAttempts);
    }
    let attempts = u32::try_from(attempts).map_err(|_| ConfigurationError::InvalidNumber {
      name:  "DB_CONNECT_ATTEMPTS",
      value: attempts.to_string(),
    })?;
    let delay = number("DB_RETRY_DELAY_SECS", &self.db_retry_delay_secs, defaults.delay.as_secs())?;
    let timeout = number(
      "DB_CONNECT_TIMEOUT_SECS",
      &self.db_connect_timeout_secs,
      DEFAULT_CONNECT_TIMEOUT_SECS,
    )?;

    Ok(Settings {
      database:            self.database(Duration::from_secs(timeout))?,
      retry:               RetryPolicy::new(attempts, Duration::from_secs(delay)),
      mail:                self.mail()?,
      port:                port("PORT", &self.port, DEFAULT_PORT)?,
      allowed_origins:     origins(text(&self.allowed_origins).unwrap_or(DEFAULT_ORIGINS))?,
      diagnostics_enabled: flag("ENABLE_DIAGNOSTICS", &self.enable_diagnostics, false)?,
    })
  }

  fn database(&self, timeout: Duration) -> Result<DatabaseSettings> {
    if let Some(raw) = text(&self.database_url)
      && let Some(db) = self.database_from_url(raw, timeout)?
    {
      return Ok(db);
    }

    let driver = text(&self.db_driver).unwrap_or("mysql").to_ascii_lowercase();
    match driver.as_str() {
      "mysql" => {
        let params = ConnectionParams {
          host:     text(&self.db_host).unwrap_or(DEFAULT_DB_HOST).to_owned(),
          port:     port("DB_PORT", &self.db_port, DEFAULT_DB_PORT)?,
          user:     owned(&self.db_user),
          password: owned(&self.db_password),
          database: text(&self.db_name).unwrap_or(DEFAULT_DB_NAME).to_owned(),
          timeout,
        };
        mysql(params)
      }
      "sqlite" => Ok(DatabaseSettings::Sqlite(PathBuf::from(
        text(&self.db_name).unwrap_or(DEFAULT_SQLITE_PATH),
      ))),
      _ => Err(ConfigurationError::UnknownDriver(driver)),
    }
  }

  /// `Ok(None)` means the URL was unusable and has been ignored.
  fn database_from_url(&self, raw: &str, timeout: Duration) -> Result<Option<DatabaseSettings>> {
    let url = match Url::parse(raw) {
      Ok(url) => url,
      Err(e) => {
        warn!(error = %e, "DATABASE_URL is not a valid URL, ignoring it");
        return Ok(None);
      }
    };

    match url.scheme() {
      "mysql" => {
        let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
          warn!("DATABASE_URL has no host, ignoring it");
          return Ok(None);
        };
        let port = match url.port() {
          Some(0) => {
            return Err(ConfigurationError::InvalidPort {
              name:  "DATABASE_URL",
              value: "0".into(),
            });
          }
          Some(p) => p,
          None => DEFAULT_DB_PORT,
        };
        let database = url.path().trim_start_matches('/');
        let url_password = match url.password() {
          Some(raw) => decoded(raw),
          None => Some(String::new()),
        };
        let (Some(url_user), Some(url_password)) = (decoded(url.username()), url_password) else {
          warn!("DATABASE_URL credentials are not valid UTF-8, ignoring it");
          return Ok(None);
        };
        let user = Some(url_user)
          .filter(|u| !u.is_empty())
          .or_else(|| owned(&self.db_user));
        let password = Some(url_password)
          .filter(|p| !p.is_empty())
          .or_else(|| owned(&self.db_password));

        mysql(ConnectionParams {
          host: host.to_owned(),
          port,
          user,
          password,
          database: if database.is_empty() { DEFAULT_DB_NAME } else { database }.to_owned(),
          timeout,
        })
        .map(Some)
      }
      "sqlite" => {
        let raw_path = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
        let path = decoded(&raw_path).unwrap_or(raw_path);
        if path.is_empty() {
          warn!("DATABASE_URL has no sqlite path, ignoring it");
          return Ok(None);
        }
        Ok(Some(DatabaseSettings::Sqlite(PathBuf::from(path))))
      }
      other => {
        warn!(scheme = other, "unsupported DATABASE_URL scheme, ignoring it");
        Ok(None)
      }
    }
  }

  fn mail(&self) -> Result<MailSettings> {
    Ok(MailSettings {
      host:     text(&self.smtp_host).unwrap_or(DEFAULT_SMTP_HOST).to_owned(),
      port:     port("SMTP_PORT", &self.smtp_port, DEFAULT_SMTP_PORT)?,
      username: owned(&self.smtp_username),
      password: owned(&self.smtp_password),
      from:     owned(&self.notify_from),
      to:       owned(&self.notify_to),
      timeout:  SMTP_TIMEOUT,
    })
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn mysql(params: ConnectionParams) -> Result<DatabaseSettings> {
  if params.user.as_deref().is_none_or(str::is_empty) {
    return Err(ConfigurationError::MissingUser);
  }
  Ok(DatabaseSettings::MySql(params))
}

/// Trimmed and non-empty, or `None`.
fn text(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn owned(value: &Option<String>) -> Option<String> { text(value).map(str::to_owned) }

/// Percent-decode one URL component. `None` when the bytes are not UTF-8.
fn decoded(raw: &str) -> Option<String> {
  percent_decode_str(raw).decode_utf8().ok().map(Cow::into_owned)
}

fn port(name: &'static str, value: &Option<String>, default: u16) -> Result<u16> {
  match text(value) {
    None => Ok(default),
    Some(v) => v
      .parse::<u16>()
      .ok()
      .filter(|p| *p != 0)
      .ok_or_else(|| ConfigurationError::InvalidPort { name, value: v.to_owned() }),
  }
}

fn number(name: &'static str, value: &Option<String>, default: u64) -> Result<u64> {
  match text(value) {
    None => Ok(default),
    Some(v) => v
      .parse()
      .map_err(|_| ConfigurationError::InvalidNumber { name, value: v.to_owned() }),
  }
}

fn flag(name: &'static str, value: &Option<String>, default: bool) -> Result<bool> {
  match text(value).map(str::to_ascii_lowercase).as_deref() {
    None => Ok(default),
    Some("1" | "true" | "yes" | "on") => Ok(true),
    Some("0" | "false" | "no" | "off") => Ok(false),
    Some(other) => Err(ConfigurationError::InvalidFlag { name, value: other.to_owned() }),
  }
}

/// Comma-separated `http(s)://host[:port]` origins.
fn origins(list: &str) -> Result<Vec<HeaderValue>> {
  list
    .split(',')
    .map(|o| o.trim().trim_end_matches('/'))
    .filter(|o| !o.is_empty())
    .map(|o| {
      Url::parse(o)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .and_then(|_| HeaderValue::from_str(o).ok())
        .ok_or_else(|| ConfigurationError::InvalidOrigin(o.to_owned()))
    })
    .collect()
}
