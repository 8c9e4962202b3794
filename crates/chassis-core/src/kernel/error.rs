//! # Chassis Core Kernel Errors
//!
//! [`Error`] covers the structural failures the kernel propagates to its
//! caller: configuration errors, malformed service declarations, unresolved
//! implementations and lifecycle misuse. Runtime faults inside a service's
//! start/stop are deliberately absent — those are absorbed into boolean
//! control signals by the orchestration loops, never propagated.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration could not be loaded or resolved
    #[error("config system error: {0}")]
    Config(#[from] ConfigError),

    /// The service declaration read from config is malformed
    #[error("service validation failed: {message}")]
    ServiceValidation { message: String },

    /// No implementation is registered for a declared service
    #[error("no service implementation registered for '{service}' (location '{location}')")]
    UnresolvedService { service: String, location: String },

    /// Two declarations share one service name
    #[error("duplicate service name '{0}' in the kernel service list")]
    DuplicateService(String),

    /// An operation was invoked in the wrong lifecycle phase
    #[error("kernel lifecycle error during {phase:?}: {message}")]
    Lifecycle {
        phase: LifecyclePhase,
        message: String,
    },
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Initialize,
    LoadServices,
    Start,
    Shutdown,
}

/// Shorthand for Result with the kernel error type
pub type Result<T> = StdResult<T, Error>;
