//! Type-keyed service registry used for late acquisition of shared collaborators.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Errors raised when a service cannot be produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocatorError {
  /// Nothing was registered for the requested type.
  #[error("no service registered for {type_name}")]
  NotRegistered {
    /// Name of the requested type.
    type_name: &'static str,
  },
}

type Factory = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

enum Registration {
  Instance(Arc<dyn Any + Send + Sync>),
  Factory(Factory),
}

/// Registry resolving services by their Rust type.
///
/// Services are either shared instances, handed out as clones, or factories invoked on
/// every lookup. Trait objects are registered through a cloneable handle such as
/// `Arc<dyn CdnUrlGenerator>`.
#[derive(Default)]
pub struct ServiceLocator {
  services: RwLock<HashMap<TypeId, Registration>>,
}

impl ServiceLocator {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Process-wide registry shared by every caller.
  pub fn global() -> Arc<ServiceLocator> {
    static GLOBAL: OnceLock<Arc<ServiceLocator>> = OnceLock::new();
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(ServiceLocator::new())))
  }

  /// Register a shared instance, replacing any earlier registration for `T`.
  pub fn register<T>(&self, value: T)
  where
    T: Clone + Send + Sync + 'static,
  {
    self.insert::<T>(Registration::Instance(Arc::new(value)));
  }

  /// Register a factory producing a fresh `T` on each lookup.
  pub fn register_factory<T, F>(&self, factory: F)
  where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
  {
    self.insert::<T>(Registration::Factory(Arc::new(move || {
      Box::new(factory()) as Box<dyn Any + Send + Sync>
    })));
  }

  /// Returns `true` when something is registered for `T`.
  pub fn contains<T: 'static>(&self) -> bool {
    self
      .services
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .contains_key(&TypeId::of::<T>())
  }

  /// Fetch the service registered for `T`.
  pub fn get<T>(&self) -> Result<T, LocatorError>
  where
    T: Clone + Send + Sync + 'static,
  {
    let not_registered = || LocatorError::NotRegistered {
      type_name: type_name::<T>(),
    };

    // Factories run outside the lock so they may consult the registry themselves.
    let factory = {
      let services = self
        .services
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
      match services.get(&TypeId::of::<T>()) {
        Some(Registration::Instance(instance)) => {
          return instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(not_registered);
        }
        Some(Registration::Factory(factory)) => Arc::clone(factory),
        None => return Err(not_registered()),
      }
    };

    factory()
      .downcast::<T>()
      .map(|boxed| *boxed)
      .map_err(|_| not_registered())
  }

  fn insert<T: 'static>(&self, registration: Registration) {
    log::debug!("registering service {}", type_name::<T>());
    self
      .services
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(TypeId::of::<T>(), registration);
  }
}

impl std::fmt::Debug for ServiceLocator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let count = self
      .services
      .read()
      .map(|services| services.len())
      .unwrap_or_default();
    f.debug_struct("ServiceLocator")
      .field("services", &count)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[test]
  fn returns_clone_of_registered_instance() {
    let locator = ServiceLocator::new();
    locator.register(String::from("shared"));

    assert!(locator.contains::<String>());
    assert_eq!(locator.get::<String>().unwrap(), "shared");
    assert_eq!(locator.get::<String>().unwrap(), "shared");
  }

  #[test]
  fn invokes_factory_per_lookup() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let locator = ServiceLocator::new();
    locator.register_factory(move || counter.fetch_add(1, Ordering::SeqCst));

    assert_eq!(locator.get::<usize>().unwrap(), 0);
    assert_eq!(locator.get::<usize>().unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn reports_missing_registrations() {
    let locator = ServiceLocator::new();
    let err = locator.get::<u32>().unwrap_err();
    assert_eq!(err, LocatorError::NotRegistered { type_name: "u32" });
    assert_eq!(err.to_string(), "no service registered for u32");
  }

  #[test]
  fn later_registration_replaces_earlier() {
    let locator = ServiceLocator::new();
    locator.register(1_u8);
    locator.register(2_u8);
    assert_eq!(locator.get::<u8>().unwrap(), 2);
  }

  #[test]
  fn global_registry_is_shared() {
    assert!(Arc::ptr_eq(&ServiceLocator::global(), &ServiceLocator::global()));
  }
}
