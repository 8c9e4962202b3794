//! Runtime faults raised inside a service's start or stop.
//!
//! These never cross the kernel boundary: the orchestration loops catch
//! them, log them and fold them into boolean control signals.
use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("I/O failure during '{operation}': {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn worker process '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Fault(String),
}

/// Shorthand for Result with the service error type
pub type Result<T> = StdResult<T, ServiceError>;
