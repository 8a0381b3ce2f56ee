//! Startup orchestration.
//!
//! # Responsibilities
//! - Claim the listening port before anything else starts
//! - Open the exchange log (via the server) before accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound once and kept, so the port cannot be taken
//!   between the availability check and serving

use tokio::net::TcpListener;

use crate::config::{ConfigError, ListenerConfig};

/// Bind the configured port, reporting a taken port as a configuration error.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, ConfigError> {
    let listener = TcpListener::bind(config.bind_address())
        .await
        .map_err(|source| ConfigError::PortUnavailable {
            port: config.port,
            source,
        })?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Listener bound");
    }
    Ok(listener)
}
