//! Handlers for `/contact`.
//!
//! | Method    | Path | Notes |
//! |-----------|------|-------|
//! | `POST`    | `/contact` | JSON body `{name, email, phone?, message}` |
//! | `OPTIONS` | `/contact` | Empty 200 for pre-flight |

use axum::{Json, extract::State, http::StatusCode};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use folio_core::{Receipt, notify::Notifier, store::Connector, submit};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Accepted {
  pub id:                 i64,
  pub name:               String,
  pub email:              String,
  pub timestamp:          DateTime<Utc>,
  pub email_notification: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitBody {
  pub status:  &'static str,
  pub message: &'static str,
  pub data:    Accepted,
}

impl From<Receipt> for SubmitBody {
  fn from(receipt: Receipt) -> Self {
    let email_notification = receipt.notification.delivered();
    let s = receipt.submission;
    Self {
      status:  "success",
      message: "Thank you for your message. I'll get back to you soon.",
      data:    Accepted {
        id: s.id,
        name: s.name,
        email: s.email,
        timestamp: s.created_at,
        email_notification,
      },
    }
  }
}

/// `POST /contact`
///
/// The body is taken raw so a missing or malformed payload is reported as a
/// validation failure rather than an extractor rejection.
pub async fn create<C, N>(
  State(state): State<AppState<C, N>>,
  body: Bytes,
) -> Result<Json<SubmitBody>, ApiError>
where
  C: Connector,
  N: Notifier,
{
  let receipt = submit(
    state.connector.as_ref(),
    &state.retry,
    state.notifier.as_deref(),
    &body,
  )
  .await?;
  Ok(Json(receipt.into()))
}

/// `OPTIONS /contact`
pub async fn preflight() -> StatusCode { StatusCode::OK }
