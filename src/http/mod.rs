//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → forward.rs (outbound URL + headers)
//!     → request entry pushed to the log queue
//!     → outbound call to the forward address
//!     → response entry pushed to the log queue
//!     → status, headers and body relayed to the client
//! ```

pub mod forward;
pub mod server;

pub use forward::{forward_url, outbound_headers, relayed_headers};
pub use server::{AppState, HttpServer};
