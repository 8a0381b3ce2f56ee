//! Shutdown coordination for the proxy.
//!
//! Two ways out: an operator-requested [`Shutdown`], which drains the
//! exchange log before returning, and a [`Fatal`] error, which stops
//! serving at once.

use tokio::sync::{broadcast, mpsc};

use crate::error::ProxyError;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fatal-error reporter and the receiver the server watches.
pub fn fatal_channel() -> (Fatal, mpsc::UnboundedReceiver<ProxyError>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Fatal { tx }, rx)
}

/// Handle for reporting an error that must take the whole proxy down.
#[derive(Debug, Clone)]
pub struct Fatal {
    tx: mpsc::UnboundedSender<ProxyError>,
}

impl Fatal {
    /// Report `err`. The first report stops the server; later ones are
    /// logged and otherwise ignored.
    pub fn raise(&self, err: ProxyError) {
        tracing::error!(error = %err, "Fatal error, stopping proxy");
        let _ = self.tx.send(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_fatal_error_is_received() {
        let (fatal, mut rx) = fatal_channel();
        fatal.clone().raise(ProxyError::QueueClosed);
        fatal.raise(ProxyError::AgentStopped("later".into()));

        assert!(matches!(rx.recv().await, Some(ProxyError::QueueClosed)));
    }

    #[tokio::test]
    async fn trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }
}
