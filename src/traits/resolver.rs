//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by [`Container`](crate::Container) (resolving against the
/// calling thread's active scope), [`Scope`](crate::Scope) (resolving against
/// that scope) and [`ResolverContext`](crate::ResolverContext) (the context a
/// factory or injected callable runs in).
///
/// Most users should use the [`Resolver`] trait instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single contract.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` - the instance, stored as `Arc<dyn Any>` wrapping an `Arc<T>`
    /// * `Ok(None)` - no registration exists for `key`
    /// * `Err(DiError)` - resolution failed (no active scope, factory error, cycle)
    fn resolve_any(&self, key: &TypeKey) -> DiResult<Option<Arc<dyn Any + Send + Sync>>>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// # Examples
///
/// ```
/// use depinj::{Container, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct ConsoleGreeter;
/// impl Greeter for ConsoleGreeter {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// let container = Container::new();
/// container.register_singleton::<dyn Greeter, _, _>(|| {
///     Arc::new(ConsoleGreeter) as Arc<dyn Greeter>
/// }).unwrap();
///
/// let greeter = container.get_required::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
///
/// // Unregistered contracts are not an error
/// assert!(container.get_instance::<String>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the contract `T`, returning `Ok(None)` when nothing is registered for it.
    fn get_instance<T>(&self) -> DiResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        match self.resolve_any(&key)? {
            None => Ok(None),
            Some(any) => any
                .downcast_ref::<Arc<T>>()
                .cloned()
                .map(Some)
                .ok_or(DiError::TypeMismatch(key.display_name())),
        }
    }

    /// Resolves the contract `T`, failing with [`DiError::NotFound`] when nothing is registered.
    fn get_required<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_instance::<T>()?
            .ok_or(DiError::NotFound(std::any::type_name::<T>()))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
