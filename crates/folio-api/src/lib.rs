//! JSON HTTP API for the folio contact backend.
//!
//! Exposes an axum [`Router`] generic over any [`Connector`] and
//! [`Notifier`]. CORS, request tracing and the panic boundary are layered on
//! by the server binary.

pub mod contact;
pub mod error;
pub mod status;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use folio_core::{RetryPolicy, notify::Notifier, store::Connector};

pub use error::{ApiError, error_response};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<C, N> {
  pub connector:           Arc<C>,
  /// `None` when no mail credentials are configured.
  pub notifier:            Option<Arc<N>>,
  pub retry:               RetryPolicy,
  /// Expose `/test-db`.
  pub diagnostics_enabled: bool,
}

// Manual impl: a derive would demand `C: Clone` and `N: Clone`.
impl<C, N> Clone for AppState<C, N> {
  fn clone(&self) -> Self {
    Self {
      connector:           Arc::clone(&self.connector),
      notifier:            self.notifier.clone(),
      retry:               self.retry,
      diagnostics_enabled: self.diagnostics_enabled,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<C, N>(state: AppState<C, N>) -> Router
where
  C: Connector + 'static,
  N: Notifier + 'static,
{
  Router::new()
    .route("/",        get(status::root::<C, N>))
    .route("/health",  get(status::health::<C, N>))
    .route("/test-db", get(status::test_db::<C, N>))
    .route("/contact", post(contact::create::<C, N>).options(contact::preflight))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
