use std::path::PathBuf;

use serde_json::Value;

use crate::config::ConfigLoader;
use crate::kernel::error::{Error, LifecyclePhase, Result};
use crate::kernel::registry::{ServiceDescriptor, ServiceRegistry, ServiceResolver};
use crate::service::Service;
use crate::utils::paths;

/// Observable kernel lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelState {
    #[default]
    Created,
    Initializing,
    Initialized,
    InitializationFailed,
    ServicesLoaded,
    Running,
    StoppedClean,
    StoppedFatal,
}

/// Reaction to a service that fails to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPolicy {
    /// Terminate the process immediately on the first stop failure
    #[default]
    Exit,
    /// Keep stopping the remaining services and report failure to the caller
    Report,
}

/// The runtime's orchestration context.
///
/// Explicitly constructed and owned by the entry point; there is no global
/// instance. The kernel owns the config loader, the service registry and the
/// resolver, and sequences initialize, load, start and stop. Services start
/// and stop in exact declaration order, one at a time.
pub struct Kernel {
    config: ConfigLoader,
    resolver: Box<dyn ServiceResolver>,
    services: ServiceRegistry,
    services_root: PathBuf,
    shutdown_policy: ShutdownPolicy,
    state: KernelState,
    initialized: bool,
}

impl Kernel {
    /// Create a kernel over a config loader and a service resolver.
    pub fn new(config: ConfigLoader, resolver: Box<dyn ServiceResolver>) -> Self {
        Self {
            config,
            resolver,
            services: ServiceRegistry::new(),
            services_root: paths::app_path().join("services"),
            shutdown_policy: ShutdownPolicy::default(),
            state: KernelState::default(),
            initialized: false,
        }
    }

    /// Override the directory default service locations are derived from.
    pub fn with_services_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.services_root = root.into();
        self
    }

    /// Override the reaction to stop failures.
    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    pub fn state(&self) -> KernelState {
        self.state
    }

    /// True once configuration has loaded successfully. Monotonic.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Drive the configuration load.
    ///
    /// The kernel only flips to initialized when every config file parsed;
    /// on failure the error is returned and the flag stays false.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::Lifecycle {
                phase: LifecyclePhase::Initialize,
                message: "kernel already initialized".to_string(),
            });
        }

        self.state = KernelState::Initializing;
        match self.config.load().await {
            Ok(()) => {
                self.initialized = true;
                self.state = KernelState::Initialized;
                log::info!(
                    "Kernel initialized ({} config namespaces)",
                    self.config.namespaces().len()
                );
                Ok(())
            }
            Err(err) => {
                self.state = KernelState::InitializationFailed;
                log::error!("Kernel initialization failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Read `kernel.services` and populate the registry.
    ///
    /// Fails on a non-sequence declaration, a malformed entry, a duplicate
    /// name or an unresolvable implementation; a failed entry never reaches
    /// the registry.
    pub async fn load_services(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(Error::Lifecycle {
                phase: LifecyclePhase::LoadServices,
                message: "services cannot load before the kernel is initialized".to_string(),
            });
        }

        let declared = match self.config.get("kernel.services")? {
            Value::Array(entries) => entries.clone(),
            _ => {
                return Err(Error::ServiceValidation {
                    message: "Kernel services list must be an array".to_string(),
                });
            }
        };

        for entry in declared {
            let descriptor: ServiceDescriptor =
                serde_json::from_value(entry).map_err(|err| Error::ServiceValidation {
                    message: format!("malformed service entry: {err}"),
                })?;
            let service = self.load_service(&descriptor)?;
            self.services.insert(descriptor.name, service)?;
        }

        self.state = KernelState::ServicesLoaded;
        log::info!("Loaded {} services", self.services.len());
        Ok(())
    }

    /// Resolve one descriptor to a constructed instance.
    fn load_service(&self, descriptor: &ServiceDescriptor) -> Result<Box<dyn Service>> {
        let location = descriptor.location.clone().unwrap_or_else(|| {
            self.services_root
                .join(format!("{}.service", descriptor.name))
                .to_string_lossy()
                .into_owned()
        });
        log::debug!("Resolving service '{}' from '{location}'", descriptor.name);
        self.resolver.resolve(descriptor, &location)
    }

    /// Start every registered service in declaration order.
    ///
    /// The first service that fails to start halts the pass; the kernel then
    /// rolls back by stopping every registered service — including those
    /// that never started, which is why stop must be safe on an unstarted
    /// service. Returns true only if every service started.
    pub async fn start_services(&mut self) -> bool {
        log::info!("Starting {} services", self.services.len());
        let mut failed = None;
        for (name, service) in self.services.iter_mut() {
            log::info!("Starting service '{name}'");
            if !Self::start_service(name, service.as_mut()).await {
                failed = Some(name.to_string());
                break;
            }
        }

        if let Some(name) = failed {
            log::error!("Service '{name}' failed to start; rolling back started services");
            self.stop_services().await;
            return false;
        }

        self.state = KernelState::Running;
        log::info!("All services running");
        true
    }

    /// Stop every registered service in declaration order.
    ///
    /// A stop failure under [`ShutdownPolicy::Exit`] terminates the process
    /// immediately; under [`ShutdownPolicy::Report`] the remaining services
    /// are still stopped and the pass reports false.
    pub async fn stop_services(&mut self) -> bool {
        log::info!("Stopping {} services", self.services.len());
        let policy = self.shutdown_policy;
        let mut all_stopped = true;
        for (name, service) in self.services.iter_mut() {
            log::info!("Stopping service '{name}'");
            if Self::stop_service(name, service.as_mut()).await {
                continue;
            }
            log::error!("Service '{name}' failed to stop");
            if policy == ShutdownPolicy::Exit {
                std::process::exit(1);
            }
            all_stopped = false;
        }

        self.state = if all_stopped {
            KernelState::StoppedClean
        } else {
            KernelState::StoppedFatal
        };
        all_stopped
    }

    /// Invoke a service's start; a fault is caught here and folded into the
    /// boolean control signal, never propagated.
    async fn start_service(name: &str, service: &mut dyn Service) -> bool {
        match service.start().await {
            Ok(started) => {
                if !started {
                    log::warn!("Service '{name}' declined to start");
                }
                started
            }
            Err(err) => {
                log::error!("Service '{name}' raised during start: {err}");
                false
            }
        }
    }

    /// Invoke a service's stop; faults are folded into the boolean control
    /// signal exactly as for start.
    async fn stop_service(name: &str, service: &mut dyn Service) -> bool {
        match service.stop().await {
            Ok(stopped) => stopped,
            Err(err) => {
                log::error!("Service '{name}' raised during stop: {err}");
                false
            }
        }
    }
}
