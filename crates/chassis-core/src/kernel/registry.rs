use std::collections::HashMap;

use serde::Deserialize;

use crate::kernel::error::{Error, Result};
use crate::service::Service;

/// A service declaration read from `kernel.services`.
///
/// `location` names where the implementation lives; when absent the kernel
/// derives `<services_root>/<name>.service`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service name; doubles as the registry key
    pub name: String,
    /// Optional implementation location override
    #[serde(default)]
    pub location: Option<String>,
}

/// Resolves a descriptor to a constructed service instance.
///
/// Substitutable for tests. `location` is the descriptor's location after
/// the default-derivation step.
pub trait ServiceResolver: Send + Sync {
    fn resolve(&self, descriptor: &ServiceDescriptor, location: &str) -> Result<Box<dyn Service>>;
}

/// Constructor signature held by the [`FactoryResolver`].
pub type ServiceFactory = Box<dyn Fn(&ServiceDescriptor) -> Box<dyn Service> + Send + Sync>;

/// Default resolver: an explicit factory registry populated at startup,
/// keyed by service name. Conformance to the service contract is the
/// [`Service`] trait bound on the factory's return type, checked at compile
/// time.
#[derive(Default)]
pub struct FactoryResolver {
    factories: HashMap<String, ServiceFactory>,
}

impl FactoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a service name. A later registration
    /// under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ServiceDescriptor) -> Box<dyn Service> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Builder-style [`register`](FactoryResolver::register).
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ServiceDescriptor) -> Box<dyn Service> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ServiceResolver for FactoryResolver {
    fn resolve(&self, descriptor: &ServiceDescriptor, location: &str) -> Result<Box<dyn Service>> {
        match self.factories.get(&descriptor.name) {
            Some(factory) => Ok(factory(descriptor)),
            None => Err(Error::UnresolvedService {
                service: descriptor.name.clone(),
                location: location.to_string(),
            }),
        }
    }
}

/// Registry of constructed services, in declaration order.
///
/// Single-writer during service loading, read-only during start/stop; the
/// temporal separation is what makes lock-free iteration safe here.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: Vec<(String, Box<dyn Service>)>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a service under `name`, preserving insertion order.
    pub fn insert(&mut self, name: impl Into<String>, service: Box<dyn Service>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateService(name));
        }
        self.entries.push((name, service));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Service> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, service)| service.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub(crate) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (&str, &mut Box<dyn Service>)> {
        self.entries
            .iter_mut()
            .map(|(name, service)| (name.as_str(), service))
    }
}
