//! Bounded FIFO queue between request handlers and the logging agent.
//!
//! `push` waits while the queue is full, so a slow log writer throttles
//! request handling instead of buffering entries without bound. The queue
//! closes once every [`EntrySender`] is dropped or the receiver closes it;
//! entries already queued are still delivered.

use tokio::sync::mpsc;

use crate::error::ProxyError;
use crate::recording::message::LogEntry;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 2;

/// Largest capacity configuration accepts.
pub const MAX_CAPACITY: usize = 1024;

/// Create a queue holding at most `capacity` entries.
///
/// # Panics
/// If `capacity` is zero or beyond tokio's permit limit; configuration
/// validation only accepts `1..=MAX_CAPACITY`.
pub fn log_queue(capacity: usize) -> (EntrySender, EntryReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (EntrySender { tx }, EntryReceiver { rx })
}

/// Producer handle, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct EntrySender {
    tx: mpsc::Sender<LogEntry>,
}

impl EntrySender {
    /// Enqueue an entry, waiting for room if the queue is full.
    pub async fn push(&self, entry: LogEntry) -> Result<(), ProxyError> {
        self.tx.send(entry).await.map_err(|_| ProxyError::QueueClosed)
    }
}

/// Consumer handle, owned by the logging agent.
#[derive(Debug)]
pub struct EntryReceiver {
    rx: mpsc::Receiver<LogEntry>,
}

impl EntryReceiver {
    /// Next entry in FIFO order, or `None` once closed and drained.
    pub async fn pop(&mut self) -> Option<LogEntry> {
        self.rx.recv().await
    }

    /// Refuse further pushes. Queued entries remain available to `pop`.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
