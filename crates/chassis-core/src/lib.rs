pub mod config;
pub mod kernel;
pub mod service;
pub mod utils;

// Re-export key public types for the binary and for service implementations.
pub use config::{ConfigError, ConfigLoader, LoadState};
pub use kernel::error::Error as KernelError;
pub use kernel::{FactoryResolver, Kernel, KernelState, ServiceDescriptor, ServiceRegistry, ServiceResolver, ShutdownPolicy};
pub use service::{Service, ServiceError, WorkerPool, WorkerService};
