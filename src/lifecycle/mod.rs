//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Validate → Bind listener → Open log → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Close log queue → Agent drains → Exit
//!     Fatal error     → Stop serving immediately → Exit non-zero
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{fatal_channel, Fatal, Shutdown};
