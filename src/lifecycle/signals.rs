//! OS signal handling.
//!
//! Ctrl+C (SIGINT) triggers a graceful shutdown: the listener stops, the
//! log queue closes and the agent drains what is left.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for Ctrl+C, then trigger `shutdown`.
pub async fn shutdown_on_ctrl_c(shutdown: &Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
    }
    shutdown.trigger();
}
