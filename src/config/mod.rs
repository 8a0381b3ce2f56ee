//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional config file (TOML), loader.rs
//!     → command-line overrides, loader.rs
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → passed to the server and the logging agent at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no process-wide state
//! - All fields have defaults except the forward address
//! - Forward address shape is checked while deserializing, so a bad
//!   address never reaches validation

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, Overrides};
pub use schema::{AddressError, ForwardAddress, ForwardConfig, ListenerConfig, ProxyConfig, RecordingConfig};
pub use validation::ValidationError;
