//! Service registration tables.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::container::ResolverContext;
use crate::descriptors::{Dependency, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::observer::Observers;

// Type-erased Arc for storage. The `Any` is always an `Arc<T>` for the
// contract `T`, so sized types and trait objects share one shape.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Provider = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Write-once cell used for singleton and scoped caching.
pub(crate) type InstanceCell = Arc<OnceCell<AnyArc>>;

/// Factory registration with its dependency manifest
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) provider: Provider,
    pub(crate) dependencies: Arc<[Dependency]>,
}

impl Registration {
    pub(crate) fn new(provider: Provider, dependencies: Vec<Dependency>) -> Self {
        Self {
            provider,
            dependencies: dependencies.into(),
        }
    }
}

/// Outcome of a registry lookup, in resolution precedence order.
pub(crate) enum Lookup {
    Cached(AnyArc),
    Singleton(Registration, InstanceCell),
    Scoped(Registration),
    Transient(Registration),
}

impl Lookup {
    pub(crate) fn lifetime(&self) -> Lifetime {
        match self {
            Lookup::Cached(_) | Lookup::Singleton(..) => Lifetime::Singleton,
            Lookup::Scoped(_) => Lifetime::Scoped,
            Lookup::Transient(_) => Lifetime::Transient,
        }
    }
}

/// The four lifetime tables plus the lock flag.
///
/// A key lives in at most one lifetime: inserting removes it from every other
/// table, so the last registration wins.
#[derive(Default)]
pub(crate) struct Registry {
    singletons: Map<TypeKey, Registration>,
    singleton_cache: Map<TypeKey, InstanceCell>,
    scoped: Map<TypeKey, Registration>,
    transient: Map<TypeKey, Registration>,
    observers: Arc<Observers>,
    locked: bool,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn ensure_unlocked(&self) -> DiResult<()> {
        if self.locked {
            Err(DiError::ContainerLocked)
        } else {
            Ok(())
        }
    }

    fn evict(&mut self, key: &TypeKey) {
        self.singletons.remove(key);
        self.singleton_cache.remove(key);
        self.scoped.remove(key);
        self.transient.remove(key);
    }

    pub(crate) fn insert(&mut self, key: TypeKey, lifetime: Lifetime, registration: Registration) -> DiResult<()> {
        self.ensure_unlocked()?;
        self.evict(&key);
        match lifetime {
            Lifetime::Singleton => {
                self.singletons.insert(key, registration);
                self.singleton_cache.insert(key, Arc::new(OnceCell::new()));
            }
            Lifetime::Scoped => {
                self.scoped.insert(key, registration);
            }
            Lifetime::Transient => {
                self.transient.insert(key, registration);
            }
        }
        Ok(())
    }

    pub(crate) fn insert_instance(&mut self, key: TypeKey, instance: AnyArc) -> DiResult<()> {
        self.ensure_unlocked()?;
        self.evict(&key);
        self.singleton_cache.insert(key, Arc::new(OnceCell::with_value(instance)));
        Ok(())
    }

    pub(crate) fn lookup(&self, key: &TypeKey) -> Option<Lookup> {
        let cell = self.singleton_cache.get(key);
        if let Some(instance) = cell.and_then(|c| c.get()) {
            return Some(Lookup::Cached(instance.clone()));
        }
        if let (Some(reg), Some(cell)) = (self.singletons.get(key), cell) {
            return Some(Lookup::Singleton(reg.clone(), cell.clone()));
        }
        if let Some(reg) = self.scoped.get(key) {
            return Some(Lookup::Scoped(reg.clone()));
        }
        self.transient.get(key).map(|reg| Lookup::Transient(reg.clone()))
    }

    pub(crate) fn lifetime_of(&self, key: &TypeKey) -> Option<Lifetime> {
        if self.singleton_cache.contains_key(key) || self.singletons.contains_key(key) {
            Some(Lifetime::Singleton)
        } else if self.scoped.contains_key(key) {
            Some(Lifetime::Scoped)
        } else if self.transient.contains_key(key) {
            Some(Lifetime::Transient)
        } else {
            None
        }
    }

    /// Factory registrations of one lifetime.
    pub(crate) fn factories(&self, lifetime: Lifetime) -> impl Iterator<Item = (&TypeKey, &Registration)> {
        let table = match lifetime {
            Lifetime::Singleton => &self.singletons,
            Lifetime::Scoped => &self.scoped,
            Lifetime::Transient => &self.transient,
        };
        table.iter()
    }

    pub(crate) fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut out = Vec::with_capacity(self.singleton_cache.len() + self.scoped.len() + self.transient.len());

        for key in self.singleton_cache.keys() {
            let registration = self.singletons.get(key);
            out.push(ServiceDescriptor {
                key: *key,
                lifetime: Lifetime::Singleton,
                dependencies: registration.map(|r| r.dependencies.to_vec()).unwrap_or_default(),
                is_instance: registration.is_none(),
            });
        }
        for lifetime in [Lifetime::Scoped, Lifetime::Transient] {
            for (key, registration) in self.factories(lifetime) {
                out.push(ServiceDescriptor {
                    key: *key,
                    lifetime,
                    dependencies: registration.dependencies.to_vec(),
                    is_instance: false,
                });
            }
        }

        out.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        out
    }

    pub(crate) fn observers(&self) -> Arc<Observers> {
        self.observers.clone()
    }

    pub(crate) fn set_observers(&mut self, observers: Observers) -> DiResult<()> {
        self.ensure_unlocked()?;
        self.observers = Arc::new(observers);
        Ok(())
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked
    }
}
