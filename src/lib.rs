//! Recording HTTP forward proxy.
//!
//! Forwards every inbound request to one fixed destination and appends
//! both legs of each exchange, with the round-trip time, to a
//! per-destination log file.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server ──▶ forward address ──▶ http::server ──▶ Client
//!                     │ request entry        response entry │
//!                     └──────────▶ recording::queue ◀───────┘
//!                                        │
//!                                        ▼
//!                              recording::agent ──▶ logs/<host.port>
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod recording;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
