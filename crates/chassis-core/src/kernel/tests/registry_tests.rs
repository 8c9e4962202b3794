use async_trait::async_trait;
use serde_json::json;

use crate::kernel::error::Error;
use crate::kernel::registry::{
    FactoryResolver, ServiceDescriptor, ServiceRegistry, ServiceResolver,
};
use crate::service::error::Result as ServiceResult;
use crate::service::Service;

#[derive(Debug)]
struct NullService {
    name: String,
}

impl NullService {
    fn boxed(name: &str) -> Box<dyn Service> {
        Box::new(Self {
            name: name.to_string(),
        })
    }
}

#[async_trait]
impl Service for NullService {
    fn name(&self) -> &str {
        &self.name
    }

    fn running(&self) -> bool {
        false
    }

    async fn start(&mut self) -> ServiceResult<bool> {
        Ok(true)
    }

    async fn stop(&mut self) -> ServiceResult<bool> {
        Ok(true)
    }
}

#[test]
fn registry_preserves_insertion_order() {
    let mut registry = ServiceRegistry::new();
    registry.insert("web", NullService::boxed("web")).unwrap();
    registry.insert("db", NullService::boxed("db")).unwrap();
    registry.insert("cache", NullService::boxed("cache")).unwrap();

    assert_eq!(3, registry.len());
    assert_eq!(vec!["web", "db", "cache"], registry.names());
    assert!(registry.contains("db"));
    assert_eq!("db", registry.get("db").unwrap().name());
    assert!(registry.get("missing").is_none());
}

#[test]
fn registry_rejects_duplicate_names() {
    let mut registry = ServiceRegistry::new();
    registry.insert("web", NullService::boxed("web")).unwrap();

    match registry.insert("web", NullService::boxed("web")) {
        Err(Error::DuplicateService(name)) => assert_eq!("web", name),
        other => panic!("expected DuplicateService, got {other:?}"),
    }
    assert_eq!(1, registry.len());
}

#[test]
fn factory_resolver_constructs_registered_services() {
    let resolver = FactoryResolver::new()
        .with("web", |descriptor: &ServiceDescriptor| {
            NullService::boxed(&descriptor.name)
        });
    assert_eq!(1, resolver.len());

    let descriptor = ServiceDescriptor {
        name: "web".to_string(),
        location: None,
    };
    let service = resolver.resolve(&descriptor, "/srv/web.service").unwrap();
    assert_eq!("web", service.name());
}

#[test]
fn factory_resolver_fails_on_unknown_names() {
    let resolver = FactoryResolver::new();
    assert!(resolver.is_empty());

    let descriptor = ServiceDescriptor {
        name: "ghost".to_string(),
        location: None,
    };
    match resolver.resolve(&descriptor, "/srv/ghost.service") {
        Err(Error::UnresolvedService { service, location }) => {
            assert_eq!("ghost", service);
            assert_eq!("/srv/ghost.service", location);
        }
        other => panic!("expected UnresolvedService, got {:?}", other.map(|s| s.name().to_string())),
    }
}

#[test]
fn descriptor_location_is_optional_in_config() {
    let bare: ServiceDescriptor = serde_json::from_value(json!({"name": "web"})).unwrap();
    assert_eq!("web", bare.name);
    assert_eq!(None, bare.location);

    let located: ServiceDescriptor =
        serde_json::from_value(json!({"name": "web", "location": "/opt/web.service"})).unwrap();
    assert_eq!(Some("/opt/web.service".to_string()), located.location);

    assert!(serde_json::from_value::<ServiceDescriptor>(json!({"location": "x"})).is_err());
}
