//! Exchange recording subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding handler (many, concurrent)
//!     → message.rs (RawMessage snapshot + timestamp = LogEntry)
//!     → queue.rs (bounded FIFO, push waits when full)
//!     → agent.rs (single consumer, pairs request/response, appends)
//!     → serialize.rs (sorted headers, raw body)
//!     → logs/<host.port>
//! ```
//!
//! # Design Decisions
//! - One agent per process; it alone opens the log file for writing
//! - Backpressure instead of buffering: a stalled writer slows requests
//! - Any I/O failure on the log is fatal

pub mod agent;
pub mod message;
pub mod queue;
pub mod serialize;

pub use agent::{log_file_path, LoggingAgent};
pub use message::{ExchangeId, LogEntry, RawMessage, StartLine};
pub use queue::{log_queue, EntryReceiver, EntrySender, DEFAULT_CAPACITY, MAX_CAPACITY};
