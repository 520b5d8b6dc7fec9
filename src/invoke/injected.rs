use std::fmt;
use std::marker::PhantomData;

use super::{Arguments, Callable};
use crate::container::Container;
use crate::descriptors::Dependency;
use crate::error::DiResult;

/// A callable bound to a container.
///
/// Created by [`Container::inject`] and [`Container::scoped_inject`]. Each
/// [`call`](Injected::call) binds the parameters afresh, so scoped and
/// transient contracts are resolved per call.
pub struct Injected<F, P> {
    container: Container,
    callable: F,
    scoped: bool,
    _params: PhantomData<fn() -> P>,
}

impl<F, P> Injected<F, P>
where
    F: Callable<P>,
{
    pub(crate) fn new(container: Container, callable: F, scoped: bool) -> Self {
        Self {
            container,
            callable,
            scoped,
            _params: PhantomData,
        }
    }

    /// Binds the parameters and invokes the callable.
    ///
    /// For a scoped injection a new scope is opened before binding and closed
    /// when the call returns, fails or unwinds.
    pub fn call(&self, args: Arguments) -> DiResult<F::Output> {
        if self.scoped {
            self.container.invoke_scoped(&self.callable, args)
        } else {
            self.container.invoke(&self.callable, args)
        }
    }

    /// Contracts the callable's parameters resolve.
    pub fn dependencies(&self) -> Vec<Dependency> {
        F::dependencies()
    }

    pub fn is_scoped(&self) -> bool {
        self.scoped
    }
}

impl<F: Clone, P> Clone for Injected<F, P> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            callable: self.callable.clone(),
            scoped: self.scoped,
            _params: PhantomData,
        }
    }
}

impl<F, P> fmt::Debug for Injected<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("callable", &std::any::type_name::<F>())
            .field("scoped", &self.scoped)
            .finish()
    }
}
