//! # Chassis Core Services
//!
//! The service capability contract and the built-in worker-pool service.
//!
//! A service is anything the kernel can start and stop; conformance is the
//! [`Service`] trait. Start and stop report success as a boolean — the
//! kernel treats an `Err` exactly like a `false`, so implementations are
//! free to surface rich [`ServiceError`] values without affecting the
//! orchestration contract.
pub mod error;
pub mod worker;

use async_trait::async_trait;

pub use error::ServiceError;
pub use worker::{WorkerPool, WorkerService};

/// Capability contract for services
#[async_trait]
pub trait Service: Send + Sync {
    /// The name of the service
    fn name(&self) -> &str;

    /// Whether the service is currently running
    fn running(&self) -> bool;

    /// Start the service running
    async fn start(&mut self) -> error::Result<bool>;

    /// Stop the service.
    ///
    /// Must succeed on a service that never started; startup rollback stops
    /// every registered service unconditionally.
    async fn stop(&mut self) -> error::Result<bool>;
}

#[cfg(test)]
mod tests;
