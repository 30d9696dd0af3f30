//! The HTTP stack around the API router: CORS, request tracing and the
//! panic boundary.

use std::{any::Any, time::Duration};

use axum::{
  Router,
  http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
  response::Response,
};
use folio_api::{AppState, error::INTERNAL_MESSAGE, error_response};
use folio_core::{notify::Notifier, store::Connector};
use tower_http::{
  catch_panic::CatchPanicLayer,
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};
use tracing::error;

/// The full application: API routes plus middleware.
pub fn app<C, N>(state: AppState<C, N>, origins: &[HeaderValue]) -> Router
where
  C: Connector + 'static,
  N: Notifier + 'static,
{
  with_layers(folio_api::router(state), origins)
}

/// Wrap any router in the server's middleware stack.
pub fn with_layers(router: Router, origins: &[HeaderValue]) -> Router {
  router
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(TraceLayer::new_for_http())
    .layer(cors(origins))
}

/// Only the listed origins may call the API from a browser.
fn cors(origins: &[HeaderValue]) -> CorsLayer {
  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins.iter().cloned()))
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([CONTENT_TYPE])
    .max_age(Duration::from_secs(60 * 60))
}

/// Turn a handler panic into the generic 500 body. The payload is logged.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
  let detail = panic
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| panic.downcast_ref::<&str>().copied())
    .unwrap_or("non-string panic payload");
  error!(detail, "handler panicked");
  error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, header},
    routing::get,
  };
  use tower::ServiceExt as _;

  use super::*;

  const ALLOWED: &str = "http://localhost:3000";

  async fn boom() -> &'static str { panic!("database handle poisoned") }

  async fn ok() -> &'static str { "ok" }

  fn stack() -> Router {
    let routes = Router::new().route("/ok", get(ok)).route("/boom", get(boom));
    with_layers(routes, &[HeaderValue::from_static(ALLOWED)])
  }

  fn get_from(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
      .uri(uri)
      .header(header::ORIGIN, origin)
      .body(Body::empty())
      .unwrap()
  }

  #[tokio::test]
  async fn listed_origin_is_allowed() {
    let resp = stack().oneshot(get_from("/ok", ALLOWED)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      ALLOWED
    );
  }

  #[tokio::test]
  async fn other_origins_get_no_cors_headers() {
    let resp = stack()
      .oneshot(get_from("/ok", "https://evil.example"))
      .await
      .unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
  }

  #[tokio::test]
  async fn preflight_is_answered() {
    let req = Request::builder()
      .method(Method::OPTIONS)
      .uri("/ok")
      .header(header::ORIGIN, ALLOWED)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
      .body(Body::empty())
      .unwrap();
    let resp = stack().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      ALLOWED
    );
  }

  #[tokio::test]
  async fn panics_become_generic_500() {
    let resp = stack().oneshot(get_from("/boom", ALLOWED)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], INTERNAL_MESSAGE);
    assert!(!body.to_string().contains("poisoned"));
  }
}
