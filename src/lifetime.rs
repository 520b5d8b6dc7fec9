//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use depinj::{Container, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let container = Container::new();
///
/// // Singleton: one instance for the container
/// container.register_singleton_instance(Arc::new(Database {
///     url: "postgres://localhost".to_string(),
/// })).unwrap();
///
/// // Transient: new instance every time
/// container.register_transient::<RequestModel, _, _>(|| {
///     Arc::new(RequestModel { id: 12345 })
/// }).unwrap();
///
/// assert_eq!(container.lifetime_of::<Database>(), Some(Lifetime::Singleton));
///
/// let db1 = container.get_required::<Database>().unwrap();
/// let db2 = container.get_required::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let m1 = container.get_required::<RequestModel>().unwrap();
/// let m2 = container.get_required::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&m1, &m2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per container, built on first request and cached forever
    Singleton,
    /// Single instance per scope, cached until the scope closes
    ///
    /// Resolving a scoped service with no scope open fails with
    /// [`DiError::NoActiveScope`](crate::DiError::NoActiveScope).
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    fn rank(self) -> u8 {
        match self {
            Lifetime::Singleton => 2,
            Lifetime::Scoped => 1,
            Lifetime::Transient => 0,
        }
    }

    /// Returns `true` when instances of `self` live strictly longer than
    /// instances of `other`.
    ///
    /// A service may only depend on contracts that it does not outlive.
    ///
    /// ```rust
    /// use depinj::Lifetime;
    ///
    /// assert!(Lifetime::Singleton.outlives(Lifetime::Scoped));
    /// assert!(Lifetime::Scoped.outlives(Lifetime::Transient));
    /// assert!(!Lifetime::Transient.outlives(Lifetime::Singleton));
    /// assert!(!Lifetime::Scoped.outlives(Lifetime::Scoped));
    /// ```
    #[inline]
    pub fn outlives(self, other: Lifetime) -> bool {
        self.rank() > other.rank()
    }

    /// Returns `true` if resolved instances are cached somewhere.
    #[inline]
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        };
        f.write_str(name)
    }
}
