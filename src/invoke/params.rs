use std::any::{type_name, Any};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::descriptors::Dependency;
use crate::error::{DiError, DiResult};
use crate::traits::Resolver;

/// A parameter the container knows how to bind.
pub trait Parameter: Sized {
    /// The contract this parameter resolves, if any. Plain arguments return `None`.
    fn dependency() -> Option<Dependency>;

    /// Binds the parameter at `index` from the supplied value, falling back to
    /// the container.
    fn bind(ctx: &ResolverContext<'_>, index: usize, supplied: Option<Box<dyn Any + Send>>) -> DiResult<Self>;
}

fn downcast<V: Any>(value: Box<dyn Any + Send>) -> DiResult<V> {
    value
        .downcast::<V>()
        .map(|v| *v)
        .map_err(|_| DiError::TypeMismatch(type_name::<V>()))
}

/// Optional contract parameter.
///
/// Holds the supplied `Arc<T>`, else the resolved instance, else nothing:
/// a missing binding is not an error.
pub struct Inject<T: ?Sized>(Option<Arc<T>>);

impl<T: ?Sized> Inject<T> {
    pub fn get(&self) -> Option<&Arc<T>> {
        self.0.as_ref()
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub fn into_inner(self) -> Option<Arc<T>> {
        self.0
    }
}

impl<T: ?Sized + Send + Sync + 'static> Parameter for Inject<T> {
    #[inline]
    fn dependency() -> Option<Dependency> {
        Some(Dependency::optional::<T>())
    }

    fn bind(ctx: &ResolverContext<'_>, _index: usize, supplied: Option<Box<dyn Any + Send>>) -> DiResult<Self> {
        match supplied {
            Some(value) => downcast::<Arc<T>>(value).map(|v| Inject(Some(v))),
            None => ctx.get_instance::<T>().map(Inject),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Inject").field(&type_name::<T>()).field(&self.is_some()).finish()
    }
}

/// Required contract parameter.
///
/// Holds the supplied `Arc<T>`, else the resolved instance; fails with
/// [`DiError::NotFound`] when neither exists.
pub struct Dep<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Dep<T> {
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }

    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: ?Sized> Deref for Dep<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + Send + Sync + 'static> Parameter for Dep<T> {
    #[inline]
    fn dependency() -> Option<Dependency> {
        Some(Dependency::required::<T>())
    }

    fn bind(ctx: &ResolverContext<'_>, _index: usize, supplied: Option<Box<dyn Any + Send>>) -> DiResult<Self> {
        match supplied {
            Some(value) => downcast::<Arc<T>>(value).map(Dep),
            None => ctx.get_required::<T>().map(Dep),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Dep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dep").field(&type_name::<T>()).finish()
    }
}

/// Plain parameter that must be supplied through [`Arguments`](crate::Arguments).
///
/// Wrap it in `Option` to make it optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg<T>(pub T);

impl<T> Arg<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Arg<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Arg<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Send + 'static> Parameter for Arg<T> {
    #[inline]
    fn dependency() -> Option<Dependency> {
        None
    }

    fn bind(_ctx: &ResolverContext<'_>, index: usize, supplied: Option<Box<dyn Any + Send>>) -> DiResult<Self> {
        let value = supplied.ok_or(DiError::MissingArgument {
            index,
            type_name: type_name::<T>(),
        })?;
        downcast::<T>(value).map(Arg)
    }
}

impl<T: Send + 'static> Parameter for Option<Arg<T>> {
    #[inline]
    fn dependency() -> Option<Dependency> {
        None
    }

    fn bind(_ctx: &ResolverContext<'_>, _index: usize, supplied: Option<Box<dyn Any + Send>>) -> DiResult<Self> {
        supplied.map(|value| downcast::<T>(value).map(Arg)).transpose()
    }
}
