//! Scoped service caching and the scope lifecycle.

use std::any::Any;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use super::context::{ResolverContext, ScopeSource};
use super::Container;
use crate::error::DiResult;
use crate::internal::{scope_store, Map};
use crate::invoke::{Arguments, Callable};
use crate::key::TypeKey;
use crate::registration::InstanceCell;
use crate::traits::ResolverCore;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Per-scope instance cache: one single-flight cell per scoped contract.
///
/// Once closed the cache is empty for good and refuses scoped resolutions.
pub(crate) struct ScopeCache {
    id: u64,
    closed: AtomicBool,
    cells: Mutex<Map<TypeKey, InstanceCell>>,
}

impl ScopeCache {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            closed: AtomicBool::new(false),
            cells: Mutex::new(Map::default()),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Cell for `key`, or `None` once the cache is closed.
    pub(crate) fn cell(&self, key: &TypeKey) -> Option<InstanceCell> {
        let mut cells = self.cells.lock();
        if self.is_closed() {
            return None;
        }
        Some(cells.entry(*key).or_insert_with(|| Arc::new(OnceCell::new())).clone())
    }

    /// Marks the cache closed and drops every cached instance.
    ///
    /// Returns `false` if it was already closed.
    pub(crate) fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Instances drop outside the lock.
        let cells = std::mem::take(&mut *self.cells.lock());
        drop(cells);
        true
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.lock().values().filter(|c| c.get().is_some()).count()
    }
}

/// Explicit scope handle.
///
/// A `Scope` resolves scoped contracts against its own cache no matter which
/// thread or task it is used from, which makes it the way to carry a scope
/// across `.await` points or into spawned tasks. Singletons come from the
/// container; transients are built fresh.
///
/// Cloning a `Scope` yields another handle to the *same* cache. Once the
/// scope is closed (its [`ScopeGuard`] dropped or
/// [`Container::close_scope`] called) every handle fails scoped resolutions
/// with [`DiError::NoActiveScope`](crate::DiError::NoActiveScope).
///
/// # Examples
///
/// ```
/// use depinj::{Container, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// struct RequestId(u32);
///
/// let next = Arc::new(AtomicU32::new(1));
/// let container = Container::new();
/// container.register_scoped::<RequestId, _, _>(move || {
///     Arc::new(RequestId(next.fetch_add(1, Ordering::SeqCst)))
/// }).unwrap();
///
/// let scope1 = container.create_scope();
/// let scope2 = container.create_scope();
///
/// let a = scope1.get_required::<RequestId>().unwrap();
/// let b = scope1.get_required::<RequestId>().unwrap();
/// let c = scope2.get_required::<RequestId>().unwrap();
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_ne!(a.0, c.0);
/// ```
#[derive(Clone)]
pub struct Scope {
    pub(crate) container: Container,
    pub(crate) cache: Arc<ScopeCache>,
}

impl Scope {
    pub(crate) fn new(container: Container, cache: Arc<ScopeCache>) -> Self {
        Self { container, cache }
    }

    /// Process-unique identifier of this scope.
    pub fn id(&self) -> u64 {
        self.cache.id()
    }

    /// Number of scoped instances cached so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the scope was closed. Detached scopes never are.
    pub fn is_closed(&self) -> bool {
        self.cache.is_closed()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Invokes `callable` with its parameters bound against this scope.
    pub fn invoke<P, F>(&self, callable: &F, args: Arguments) -> DiResult<F::Output>
    where
        F: Callable<P>,
    {
        let ctx = ResolverContext::new(&self.container, ScopeSource::Explicit(self.cache.clone()));
        callable.call(&ctx, args)
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &TypeKey) -> DiResult<Option<Arc<dyn Any + Send + Sync>>> {
        self.container
            .resolve_with(key, &ScopeSource::Explicit(self.cache.clone()))
    }
}

/// RAII guard for the calling thread's active scope.
///
/// Returned by [`Container::open_scope`]. While it lives, the scope is the
/// active scope of its container on this thread; dropping it (or calling
/// [`ScopeGuard::close`]) closes the scope on every exit path, including
/// unwinding. Cached instances are released, no disposal hooks run.
///
/// The guard is `!Send`: a scope must be closed on the thread that opened it.
pub struct ScopeGuard {
    scope: Scope,
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    pub(crate) fn new(scope: Scope) -> Self {
        Self {
            scope,
            _not_send: PhantomData,
        }
    }

    /// The scope opened by this guard.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Closes the scope now.
    pub fn close(self) {}
}

impl Deref for ScopeGuard {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        scope_store::close(self.scope.container.id(), self.scope.id());
        if self.scope.cache.close() {
            tracing::trace!(scope = self.scope.id(), "scope closed");
        }
    }
}
