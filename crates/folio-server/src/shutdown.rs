//! Graceful shutdown on Ctrl-C or SIGTERM.

use tokio::signal;
use tracing::{error, info};

/// Resolves when the process is asked to stop.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    match signal::ctrl_c().await {
      Ok(()) => info!("received Ctrl-C, shutting down"),
      Err(e) => {
        error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
        info!("received SIGTERM, shutting down");
      }
      Err(e) => {
        error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
