//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require a forward address before the core starts
//! - Validate value ranges (queue capacity in `1..=MAX_CAPACITY`)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::recording::MAX_CAPACITY;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a forward address (scheme://host[:port]) is required")]
    MissingForwardAddress,

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("queue capacity must be at most {max}, got {got}")]
    QueueCapacityTooLarge { got: usize, max: usize },

    #[error("logs directory must not be empty")]
    EmptyLogsDir,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.forward.address.is_none() {
        errors.push(ValidationError::MissingForwardAddress);
    }
    if config.recording.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    } else if config.recording.queue_capacity > MAX_CAPACITY {
        errors.push(ValidationError::QueueCapacityTooLarge {
            got: config.recording.queue_capacity,
            max: MAX_CAPACITY,
        });
    }
    if config.recording.logs_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogsDir);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
