//! Error types shared across subsystems.
//!
//! Every variant of [`ProxyError`] is fatal: the proxy never degrades to a
//! partial response or continues without its exchange log.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Startup configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The logs directory or the destination log file could not be opened.
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending an entry to the log file failed.
    #[error("cannot write log file {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inbound request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    /// The outbound call or the upstream response body failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The outbound request could not be built from the inbound one.
    #[error("cannot build outbound request: {0}")]
    InvalidRequest(String),

    /// An entry was pushed after the log queue was closed.
    #[error("log queue is closed")]
    QueueClosed,

    /// The logging agent task ended before the server did.
    #[error("logging agent stopped: {0}")]
    AgentStopped(String),

    /// The listener failed while serving.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
