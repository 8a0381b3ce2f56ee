//! The logging agent: sole writer of a destination's exchange log.
//!
//! Entries are drained from the queue in order and appended as:
//!
//! ```text
//! ==> 15/01/2024 10:30:00
//! <rendered request>
//! ==> 15/01/2024 10:30:01
//! <rendered response>
//! ==> Elapsed: 12.5ms
//!
//! ```
//!
//! The elapsed time of a response is measured against the request entry
//! of the same exchange. A response whose request was never seen falls
//! back to the most recent request entry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::ForwardAddress;
use crate::error::ProxyError;
use crate::recording::message::{ExchangeId, LogEntry};
use crate::recording::queue::EntryReceiver;
use crate::recording::serialize;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Path of the log file for `address` inside `logs_dir`.
pub fn log_file_path(logs_dir: &Path, address: &ForwardAddress) -> PathBuf {
    logs_dir.join(address.log_file_name())
}

/// Request/response pairing state.
#[derive(Debug, Default)]
struct Pairing {
    last_request: Option<Instant>,
    open: HashMap<ExchangeId, Instant>,
}

impl Pairing {
    fn format_entry(&mut self, entry: &LogEntry) -> Vec<u8> {
        let mut out = format!("==> {}\n", entry.timestamp.format(TIMESTAMP_FORMAT)).into_bytes();
        out.extend_from_slice(&serialize::render(&entry.message));
        out.push(b'\n');

        if entry.message.is_request() {
            self.last_request = Some(entry.instant);
            self.open.insert(entry.exchange, entry.instant);
        } else {
            let started = self.open.remove(&entry.exchange).or(self.last_request);
            let elapsed = match started {
                Some(at) => format!("{:?}", entry.instant.saturating_duration_since(at)),
                None => "unknown".to_string(),
            };
            out.extend_from_slice(format!("==> Elapsed: {elapsed}\n\n").as_bytes());
        }

        out
    }
}

/// Long-lived task appending queued entries to one log file.
pub struct LoggingAgent {
    path: PathBuf,
    file: File,
    queue: EntryReceiver,
    pairing: Pairing,
}

impl LoggingAgent {
    /// Create the logs directory if needed and open the file for appending.
    pub async fn open(path: PathBuf, queue: EntryReceiver) -> Result<Self, ProxyError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(|source| ProxyError::LogFile {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| ProxyError::LogFile {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), "Exchange log opened");

        Ok(Self {
            path,
            file,
            queue,
            pairing: Pairing::default(),
        })
    }

    /// Drain the queue until it is closed and empty, then release the file.
    pub async fn run(mut self) -> Result<(), ProxyError> {
        while let Some(entry) = self.queue.pop().await {
            let block = self.pairing.format_entry(&entry);
            self.append(&block).await?;
            tracing::trace!(exchange = %entry.exchange, bytes = block.len(), "Entry written");
        }

        self.file.sync_all().await.map_err(|source| ProxyError::LogWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "Exchange log closed");
        Ok(())
    }

    async fn append(&mut self, block: &[u8]) -> Result<(), ProxyError> {
        let result = async {
            self.file.write_all(block).await?;
            self.file.flush().await
        }
        .await;

        result.map_err(|source| ProxyError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }
}
