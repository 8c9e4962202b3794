//! # Chassis Core Kernel
//!
//! The `kernel` module is the heart of the runtime. It owns the registry of
//! declared services and sequences their lifecycle:
//!
//! - **Initialize**: drive the configuration load; the kernel only reports
//!   itself initialized once every config file has parsed.
//! - **Load services**: read the `kernel.services` declaration, resolve each
//!   descriptor through a [`ServiceResolver`](registry::ServiceResolver) and
//!   populate the registry in declaration order.
//! - **Start services**: start each service sequentially; the first failure
//!   halts further starts and rolls the whole set back by stopping every
//!   registered service.
//! - **Stop services**: stop each service sequentially; the reaction to a
//!   stop failure is governed by [`ShutdownPolicy`](bootstrap::ShutdownPolicy).
//!
//! There is no dependency-injection container: service construction is a
//! direct call through the resolver's factory registry. All diagnostics go
//! through the `log` facade; the kernel never writes output directly.
pub mod bootstrap;
pub mod error;
pub mod registry;

pub use bootstrap::{Kernel, KernelState, ShutdownPolicy};
pub use error::{Error, Result};
pub use registry::{FactoryResolver, ServiceDescriptor, ServiceRegistry, ServiceResolver};

#[cfg(test)]
mod tests;
