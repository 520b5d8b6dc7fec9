//! The dependency injection container.
//!
//! This module holds the [`Container`] type: registration, locking, scope
//! lifecycle and the resolution algorithm.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::{scope_store, StackGuard};
use crate::invoke::{Arguments, Callable, Injected, IntoInstance};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::observer::DiObserver;
use crate::options::ContainerOptions;
use crate::registration::{AnyArc, Lookup, Provider, Registration, Registry};
use crate::traits::ResolverCore;
use crate::validation::{self, ValidationReport};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub(crate) use context::ScopeSource;
pub(crate) use scope::ScopeCache;
pub use scope::{Scope, ScopeGuard};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Type-keyed service container.
///
/// Contracts are registered against providers under a [`Lifetime`], then
/// resolved through the [`Resolver`](crate::Resolver) trait or bound into
/// callables with [`inject`](Container::inject). Registration is a setup
/// phase: [`validate_and_lock`](Container::validate_and_lock) checks lifetime
/// ordering and freezes the registry.
///
/// `Container` is a cheap handle; clones share the same registry and caches.
/// Independent containers never share state.
///
/// The handle a singleton factory receives (through `Dep<Container>`) is
/// root-bound: it resolves as if no scope were open, so scoped contracts fail
/// with [`DiError::NoActiveScope`] instead of leaking into the singleton.
///
/// # Examples
///
/// ```
/// use depinj::{Container, Dep, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self, name: &str) -> String;
/// }
///
/// struct ConsoleGreeter;
/// impl Greeter for ConsoleGreeter {
///     fn greet(&self, name: &str) -> String { format!("hello, {}", name) }
/// }
///
/// struct Session { greeter: Arc<dyn Greeter> }
///
/// let container = Container::new();
/// container.register_singleton::<dyn Greeter, _, _>(|| {
///     Arc::new(ConsoleGreeter) as Arc<dyn Greeter>
/// }).unwrap();
/// container.register_scoped::<Session, _, _>(|greeter: Dep<dyn Greeter>| {
///     Arc::new(Session { greeter: greeter.into_inner() })
/// }).unwrap();
/// container.validate_and_lock().unwrap();
///
/// let scope = container.open_scope().unwrap();
/// let session = scope.get_required::<Session>().unwrap();
/// assert_eq!(session.greeter.greet("ada"), "hello, ada");
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
    root_bound: bool,
}

struct ContainerInner {
    id: u64,
    registry: RwLock<Registry>,
    options: ContainerOptions,
}

impl Container {
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
                registry: RwLock::new(Registry::new()),
                options,
            }),
            root_bound: false,
        }
    }

    fn as_root_bound(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            root_bound: true,
        }
    }

    /// Where this handle looks for the active scope.
    fn ambient(&self) -> ScopeSource {
        if self.root_bound {
            ScopeSource::Root
        } else {
            ScopeSource::Ambient
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    // ----- Registration -----

    /// Registers `T` as a singleton built lazily by `factory`.
    ///
    /// The factory runs at most once, even under concurrent first resolution.
    /// Its parameters are bound from the container and form the dependency
    /// manifest checked by [`validate_and_lock`](Container::validate_and_lock).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depinj::{Container, Dep, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Config { url: String }
    /// struct Database { url: String }
    ///
    /// let container = Container::new();
    /// container.register_singleton_instance(Arc::new(Config { url: "pg://".into() })).unwrap();
    /// container.register_singleton::<Database, _, _>(|cfg: Dep<Config>| {
    ///     Arc::new(Database { url: cfg.url.clone() })
    /// }).unwrap();
    ///
    /// assert_eq!(container.get_required::<Database>().unwrap().url, "pg://");
    /// ```
    pub fn register_singleton<T, P, F>(&self, factory: F) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Callable<P>,
        F::Output: IntoInstance<T>,
    {
        self.register_factory::<T, P, F>(Lifetime::Singleton, factory)
    }

    /// Registers a pre-built singleton instance.
    ///
    /// ```rust
    /// use depinj::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync { fn now(&self) -> u64; }
    /// struct FixedClock;
    /// impl Clock for FixedClock { fn now(&self) -> u64 { 42 } }
    ///
    /// let container = Container::new();
    /// container.register_singleton_instance::<dyn Clock>(Arc::new(FixedClock)).unwrap();
    /// assert_eq!(container.get_required::<dyn Clock>().unwrap().now(), 42);
    /// ```
    pub fn register_singleton_instance<T>(&self, instance: Arc<T>) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.inner.registry.write().insert_instance(key, Arc::new(instance))?;
        tracing::debug!(service = key.display_name(), "registered singleton instance");
        Ok(self)
    }

    /// Registers `T` as scoped: one instance per open scope.
    pub fn register_scoped<T, P, F>(&self, factory: F) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Callable<P>,
        F::Output: IntoInstance<T>,
    {
        self.register_factory::<T, P, F>(Lifetime::Scoped, factory)
    }

    /// Registers `T` as transient: a new instance on every resolution.
    pub fn register_transient<T, P, F>(&self, factory: F) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Callable<P>,
        F::Output: IntoInstance<T>,
    {
        self.register_factory::<T, P, F>(Lifetime::Transient, factory)
    }

    fn register_factory<T, P, F>(&self, lifetime: Lifetime, factory: F) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Callable<P>,
        F::Output: IntoInstance<T>,
    {
        let key = TypeKey::of::<T>();
        let dependencies = F::dependencies();
        let dependency_count = dependencies.len();
        let provider: Provider = Arc::new(move |ctx: &ResolverContext<'_>| -> DiResult<AnyArc> {
            let instance: Arc<T> = factory
                .call(ctx, Arguments::new())?
                .into_instance(key.display_name())?;
            let erased: AnyArc = Arc::new(instance);
            Ok(erased)
        });

        self.inner
            .registry
            .write()
            .insert(key, lifetime, Registration::new(provider, dependencies))?;
        tracing::debug!(
            service = key.display_name(),
            %lifetime,
            dependencies = dependency_count,
            "registered service"
        );
        Ok(self)
    }

    /// Attaches a resolution observer. Part of the setup phase: fails with
    /// [`DiError::ContainerLocked`] after lock.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) -> DiResult<&Self> {
        let mut registry = self.inner.registry.write();
        let observers = registry.observers().with(observer);
        registry.set_observers(observers)?;
        Ok(self)
    }

    // ----- Introspection -----

    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.lifetime_of::<T>().is_some()
    }

    pub fn lifetime_of<T: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.inner.registry.read().lifetime_of(&TypeKey::of::<T>())
    }

    /// All registrations, sorted by type name.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner.registry.read().descriptors()
    }

    // ----- Validation & locking -----

    /// Checks every registration's dependency manifest against lifetime
    /// ordering without locking.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.inner.registry.read())
    }

    /// Validates lifetime ordering and, on success, locks the registry.
    ///
    /// On failure the registry is left unlocked and unchanged so the
    /// registrations can be corrected. Calling it on a locked container
    /// succeeds without re-validating.
    ///
    /// ```rust
    /// use depinj::{Container, Dep, DiError};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(u64);
    /// struct Cache { id: Arc<RequestId> }
    ///
    /// let container = Container::new();
    /// container.register_scoped::<RequestId, _, _>(|| Arc::new(RequestId(1))).unwrap();
    /// container.register_singleton::<Cache, _, _>(|id: Dep<RequestId>| {
    ///     Arc::new(Cache { id: id.into_inner() })
    /// }).unwrap();
    ///
    /// assert!(matches!(
    ///     container.validate_and_lock(),
    ///     Err(DiError::InvalidDependencyLifetime { .. })
    /// ));
    /// assert!(!container.is_locked());
    /// ```
    pub fn validate_and_lock(&self) -> DiResult<()> {
        let mut registry = self.inner.registry.write();
        if registry.is_locked() {
            return Ok(());
        }

        let report = validation::validate(&registry);
        for warning in &report.warnings {
            tracing::debug!(%warning, "validation warning");
        }
        if let Some(violation) = report.errors.first() {
            tracing::warn!(
                violations = report.errors.len(),
                first = %violation,
                "lifetime validation failed"
            );
            return Err(violation.clone().into());
        }

        registry.lock();
        tracing::debug!(container = self.id(), "container locked");
        Ok(())
    }

    /// Locks the registry without validation. Idempotent.
    pub fn lock(&self) {
        self.inner.registry.write().lock();
    }

    pub fn is_locked(&self) -> bool {
        self.inner.registry.read().is_locked()
    }

    // ----- Scopes -----

    /// Opens a fresh scope and makes it the calling thread's active scope.
    ///
    /// The scope closes when the returned guard drops. If a scope is already
    /// active, [`ContainerOptions::nested_scopes`] decides: the default stacks
    /// the new scope on top (the outer one becomes active again on close),
    /// `Reject` fails with [`DiError::ScopeAlreadyActive`].
    ///
    /// ```rust
    /// use depinj::{Container, DiError, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Unit;
    ///
    /// let container = Container::new();
    /// container.register_scoped::<Unit, _, _>(|| Arc::new(Unit)).unwrap();
    ///
    /// assert!(matches!(container.get_instance::<Unit>(), Err(DiError::NoActiveScope(_))));
    /// {
    ///     let _scope = container.open_scope().unwrap();
    ///     let a = container.get_required::<Unit>().unwrap();
    ///     let b = container.get_required::<Unit>().unwrap();
    ///     assert!(Arc::ptr_eq(&a, &b));
    /// }
    /// assert!(container.current_scope().is_none());
    /// ```
    pub fn open_scope(&self) -> DiResult<ScopeGuard> {
        let cache = Arc::new(ScopeCache::new());
        scope_store::open(self.id(), cache.clone(), self.inner.options.nested_scopes)?;
        tracing::trace!(container = self.id(), scope = cache.id(), "scope opened");
        Ok(ScopeGuard::new(Scope::new(self.clone(), cache)))
    }

    /// Closes the calling thread's active scope, if any.
    ///
    /// The scope's cached instances are released and any [`Scope`] handle to
    /// it fails scoped resolutions from now on. Returns `false` when no scope
    /// was active. The guard of a scope closed this way does nothing when it
    /// drops.
    pub fn close_scope(&self) -> bool {
        match scope_store::close_current(self.id()) {
            Some(cache) => {
                cache.close();
                tracing::trace!(container = self.id(), scope = cache.id(), "scope closed");
                true
            }
            None => false,
        }
    }

    /// The calling thread's active scope. Always `None` for the root-bound
    /// handle given to singleton factories.
    pub fn current_scope(&self) -> Option<Scope> {
        if self.root_bound {
            return None;
        }
        scope_store::current(self.id()).map(|cache| Scope::new(self.clone(), cache))
    }

    /// Creates a detached scope that is never the ambient scope.
    ///
    /// Use it to carry a scope explicitly, e.g. into async tasks.
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone(), Arc::new(ScopeCache::new()))
    }

    // ----- Injection -----

    /// Wraps `callable` so its parameters are bound from this container on
    /// every call, using the calling thread's active scope.
    ///
    /// ```rust
    /// use depinj::{Arg, Arguments, Container, Inject};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync { fn greet(&self, who: &str) -> String; }
    /// struct Polite;
    /// impl Greeter for Polite {
    ///     fn greet(&self, who: &str) -> String { format!("good day, {}", who) }
    /// }
    ///
    /// let container = Container::new();
    /// container.register_singleton_instance::<dyn Greeter>(Arc::new(Polite)).unwrap();
    ///
    /// let welcome = container.inject(|greeter: Inject<dyn Greeter>, name: Arg<String>| {
    ///     greeter.get().map(|g| g.greet(&name)).unwrap_or_default()
    /// });
    ///
    /// let message = welcome.call(Arguments::new().with(1, "ada".to_string())).unwrap();
    /// assert_eq!(message, "good day, ada");
    /// ```
    pub fn inject<P, F>(&self, callable: F) -> Injected<F, P>
    where
        F: Callable<P>,
    {
        Injected::new(self.clone(), callable, false)
    }

    /// Like [`inject`](Container::inject), but every call runs inside its own
    /// freshly opened scope, closed on every exit path.
    pub fn scoped_inject<P, F>(&self, callable: F) -> Injected<F, P>
    where
        F: Callable<P>,
    {
        Injected::new(self.clone(), callable, true)
    }

    /// Binds and invokes `callable` once against the calling thread's active scope.
    pub fn invoke<P, F>(&self, callable: &F, args: Arguments) -> DiResult<F::Output>
    where
        F: Callable<P>,
    {
        let ctx = ResolverContext::new(self, self.ambient());
        callable.call(&ctx, args)
    }

    /// Binds and invokes `callable` once inside a freshly opened scope.
    pub fn invoke_scoped<P, F>(&self, callable: &F, args: Arguments) -> DiResult<F::Output>
    where
        F: Callable<P>,
    {
        let guard = self.open_scope()?;
        guard.invoke(callable, args)
    }

    // ----- Resolution -----

    pub(crate) fn resolve_with(&self, key: &TypeKey, scope: &ScopeSource) -> DiResult<Option<AnyArc>> {
        if *key == TypeKey::of::<Container>() {
            let me = match scope {
                ScopeSource::Root => self.as_root_bound(),
                _ => self.clone(),
            };
            let me: AnyArc = Arc::new(Arc::new(me));
            return Ok(Some(me));
        }

        let (found, observers) = {
            let registry = self.inner.registry.read();
            (registry.lookup(key), registry.observers())
        };
        let Some(found) = found else {
            tracing::trace!(service = key.display_name(), "no binding");
            return Ok(None);
        };

        if !observers.has_observers() {
            return self.construct(key, found, scope).map(Some);
        }

        let lifetime = found.lifetime();
        observers.resolving(key, lifetime);
        let start = Instant::now();
        let result = self.construct(key, found, scope);
        match &result {
            Ok(_) => observers.resolved(key, lifetime, start.elapsed()),
            Err(error) => observers.failed(key, error),
        }
        result.map(Some)
    }

    fn construct(&self, key: &TypeKey, found: Lookup, scope: &ScopeSource) -> DiResult<AnyArc> {
        let max_depth = self.inner.options.max_depth;
        match found {
            Lookup::Cached(instance) => Ok(instance),
            Lookup::Singleton(registration, cell) => {
                if let Some(instance) = cell.get() {
                    return Ok(instance.clone());
                }
                let _guard = StackGuard::enter(self.id(), *key, max_depth)?;
                cell.get_or_try_init(|| {
                    tracing::trace!(service = key.display_name(), "constructing singleton");
                    (registration.provider)(&ResolverContext::root(self))
                })
                .cloned()
            }
            Lookup::Scoped(registration) => {
                let cache = match scope {
                    ScopeSource::Explicit(cache) => Some(cache.clone()),
                    ScopeSource::Ambient => self.current_scope().map(|s| s.cache),
                    ScopeSource::Root => None,
                }
                .ok_or(DiError::NoActiveScope(key.display_name()))?;

                let cell = cache
                    .cell(key)
                    .ok_or(DiError::NoActiveScope(key.display_name()))?;
                if let Some(instance) = cell.get() {
                    return Ok(instance.clone());
                }
                let _guard = StackGuard::enter(self.id(), *key, max_depth)?;
                cell.get_or_try_init(|| {
                    let ctx = ResolverContext::new(self, ScopeSource::Explicit(cache.clone()));
                    (registration.provider)(&ctx)
                })
                .cloned()
            }
            Lookup::Transient(registration) => {
                let _guard = StackGuard::enter(self.id(), *key, max_depth)?;
                (registration.provider)(&ResolverContext::new(self, scope.clone()))
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &TypeKey) -> DiResult<Option<Arc<dyn Any + Send + Sync>>> {
        self.resolve_with(key, &self.ambient())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.registry.read();
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("root_bound", &self.root_bound)
            .field("services", &registry.descriptors().len())
            .field("locked", &registry.is_locked())
            .finish()
    }
}
