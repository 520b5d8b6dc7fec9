//! Resolver context for factories and injected callables.

use std::any::Any;
use std::sync::Arc;

use super::{Container, ScopeCache};
use crate::error::DiResult;
use crate::key::TypeKey;
use crate::traits::ResolverCore;

/// Which scope scoped contracts resolve against.
#[derive(Clone)]
pub(crate) enum ScopeSource {
    /// No scope: singleton construction always runs here.
    Root,
    /// The calling thread's active scope, looked up when needed.
    Ambient,
    /// A specific scope carried explicitly.
    Explicit(Arc<ScopeCache>),
}

/// Context passed to factories and injected callables.
///
/// Parameters of a [`Callable`](crate::Callable) are bound through this
/// context, and factories may use it directly (via [`Resolver`](crate::Resolver))
/// by declaring a [`Dep<Container>`](crate::Dep) parameter or through
/// [`Container::invoke`].
///
/// A singleton factory always runs in the root context: it sees no scope, and
/// a `Dep<Container>` it declares is root-bound as well, so a singleton can
/// never capture a scoped instance at construction time.
pub struct ResolverContext<'a> {
    container: &'a Container,
    scope: ScopeSource,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a Container, scope: ScopeSource) -> Self {
        Self { container, scope }
    }

    pub(crate) fn root(container: &'a Container) -> Self {
        Self::new(container, ScopeSource::Root)
    }

    /// The container this context resolves from.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Whether scoped contracts can be resolved from this context.
    pub fn has_scope(&self) -> bool {
        match &self.scope {
            ScopeSource::Root => false,
            ScopeSource::Explicit(_) => true,
            ScopeSource::Ambient => self.container.current_scope().is_some(),
        }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &TypeKey) -> DiResult<Option<Arc<dyn Any + Send + Sync>>> {
        self.container.resolve_with(key, &self.scope)
    }
}
