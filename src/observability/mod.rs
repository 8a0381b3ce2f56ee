//! Observability subsystem.
//!
//! Operator-facing diagnostics only. The exchange log itself lives in
//! `crate::recording`.

pub mod logging;
