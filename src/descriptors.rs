//! Service descriptors for introspection and diagnostics.

use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// One entry of a factory's dependency manifest.
///
/// Manifests are derived from the factory's parameter types (see
/// [`Parameter`](crate::Parameter)), so every contract a factory can receive
/// is known at registration time without runtime reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Contract the parameter resolves.
    pub key: TypeKey,
    /// `true` when a missing binding fails the resolution ([`Dep<T>`](crate::Dep)),
    /// `false` when it is tolerated ([`Inject<T>`](crate::Inject)).
    pub required: bool,
}

impl Dependency {
    pub fn required<T: ?Sized + 'static>() -> Self {
        Self { key: TypeKey::of::<T>(), required: true }
    }

    pub fn optional<T: ?Sized + 'static>() -> Self {
        Self { key: TypeKey::of::<T>(), required: false }
    }
}

/// Service descriptor for introspection and diagnostics
///
/// # Examples
///
/// ```rust
/// use depinj::{Container, Dep, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db: Arc<Database> }
///
/// let container = Container::new();
/// container.register_singleton_instance(Arc::new(Database {
///     url: "postgres://localhost".to_string(),
/// })).unwrap();
/// container.register_scoped::<Repository, _, _>(|db: Dep<Database>| {
///     Arc::new(Repository { db: db.into_inner() })
/// }).unwrap();
///
/// let descriptors = container.descriptors();
/// let repo = descriptors.iter()
///     .find(|d| d.type_name().contains("Repository"))
///     .unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Scoped);
/// assert_eq!(repo.dependencies.len(), 1);
/// assert!(repo.dependencies[0].required);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Contract key
    pub key: TypeKey,
    /// Registered lifetime
    pub lifetime: Lifetime,
    /// Contracts the factory receives as parameters
    pub dependencies: Vec<Dependency>,
    /// `true` for pre-built singleton instances
    pub is_instance: bool,
}

impl ServiceDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn depends_on(&self, key: &TypeKey) -> bool {
        self.dependencies.iter().any(|d| d.key == *key)
    }
}
