//! Read-only endpoints: liveness, health and the gated diagnostic dump.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Always 200 |
//! | `GET`  | `/health` | Always 200; `status` is `healthy` or `degraded` |
//! | `GET`  | `/test-db` | 404 unless diagnostics are enabled |

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use folio_core::{
  DatabaseHealth, Submission, check_health, diagnostics, notify::Notifier, store::Connector,
};
use serde::Serialize;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Rows returned by `/test-db`.
pub const DIAGNOSTIC_ROWS: usize = 10;

// ─── Root ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Endpoint {
  pub method:      &'static str,
  pub path:        &'static str,
  pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RootBody {
  pub status:    &'static str,
  pub message:   &'static str,
  pub timestamp: DateTime<Utc>,
  pub endpoints: Vec<Endpoint>,
}

/// `GET /`
pub async fn root<C, N>(State(state): State<AppState<C, N>>) -> Json<RootBody>
where
  C: Connector,
  N: Notifier,
{
  let mut endpoints = vec![
    Endpoint { method: "GET",  path: "/",        description: "service status" },
    Endpoint { method: "GET",  path: "/health",  description: "database and mail health" },
    Endpoint { method: "POST", path: "/contact", description: "submit the contact form" },
  ];
  if state.diagnostics_enabled {
    endpoints.push(Endpoint {
      method:      "GET",
      path:        "/test-db",
      description: "list tables and recent submissions",
    });
  }

  Json(RootBody {
    status: "success",
    message: "Contact API is running",
    timestamp: Utc::now(),
    endpoints,
  })
}

// ─── Health ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Services {
  pub email: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
  pub status:    &'static str,
  pub timestamp: DateTime<Utc>,
  pub database:  DatabaseHealth,
  pub services:  Services,
}

/// `GET /health`
pub async fn health<C, N>(State(state): State<AppState<C, N>>) -> Json<HealthBody>
where
  C: Connector,
  N: Notifier,
{
  let database = check_health(state.connector.as_ref()).await;
  if !database.is_connected() {
    warn!(endpoint = %state.connector.target(), "health check could not reach the database");
  }

  Json(HealthBody {
    status: if database.is_connected() { "healthy" } else { "degraded" },
    timestamp: Utc::now(),
    database,
    services: Services {
      email: if state.notifier.is_some() { "configured" } else { "not configured" },
    },
  })
}

// ─── Diagnostics ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DiagnosticsBody {
  pub status:          &'static str,
  pub tables:          Vec<String>,
  pub recent_contacts: Vec<Submission>,
}

/// `GET /test-db`
pub async fn test_db<C, N>(
  State(state): State<AppState<C, N>>,
) -> Result<Json<DiagnosticsBody>, ApiError>
where
  C: Connector,
  N: Notifier,
{
  if !state.diagnostics_enabled {
    return Err(ApiError::NotFound);
  }

  let dump = diagnostics(state.connector.as_ref(), &state.retry, DIAGNOSTIC_ROWS).await?;
  Ok(Json(DiagnosticsBody {
    status:          "success",
    tables:          dump.tables,
    recent_contacts: dump.recent,
  }))
}
