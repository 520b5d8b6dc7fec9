//! Automatic parameter binding.
//!
//! Any `Fn(P1, ..., Pn) -> R` with up to eight parameters implementing
//! [`Parameter`] is a [`Callable`]. Its parameter types double as a static
//! dependency manifest, and at call time each parameter binds itself from the
//! supplied [`Arguments`] or from the container.

use std::error::Error;
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::descriptors::Dependency;
use crate::error::{DiError, DiResult};

mod arguments;
mod injected;
mod params;

pub use arguments::Arguments;
pub use injected::Injected;
pub use params::{Arg, Dep, Inject, Parameter};

/// A function whose parameters can be bound by the container.
///
/// Implemented for every `Fn` of arity 0 to 8 whose parameters implement
/// [`Parameter`]. `Params` is the tuple of parameter types; it is inferred and
/// never written by hand.
pub trait Callable<Params>: Send + Sync + 'static {
    type Output;

    /// Contracts the parameters resolve, in parameter order.
    fn dependencies() -> Vec<Dependency>;

    /// Binds every parameter and invokes the function.
    ///
    /// Parameters bind left to right; the first failure aborts the call.
    fn call(&self, ctx: &ResolverContext<'_>, args: Arguments) -> DiResult<Self::Output>;
}

macro_rules! define_callable ({ $($param:ident)* } => {
    impl<Func, R, $($param,)*> Callable<($($param,)*)> for Func
    where
        Func: Fn($($param),*) -> R + Send + Sync + 'static,
        $($param: Parameter,)*
    {
        type Output = R;

        #[inline]
        fn dependencies() -> Vec<Dependency> {
            #[allow(unused_mut)]
            let mut deps = Vec::new();
            $(deps.extend($param::dependency());)*
            deps
        }

        #[inline]
        #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
        fn call(&self, ctx: &ResolverContext<'_>, mut args: Arguments) -> DiResult<R> {
            let mut index = 0usize;
            $(
                let $param = $param::bind(ctx, index, args.take(index))?;
                index += 1;
            )*
            Ok((self)($($param),*))
        }
    }
});

define_callable! {}
define_callable! { T1 }
define_callable! { T1 T2 }
define_callable! { T1 T2 T3 }
define_callable! { T1 T2 T3 T4 }
define_callable! { T1 T2 T3 T4 T5 }
define_callable! { T1 T2 T3 T4 T5 T6 }
define_callable! { T1 T2 T3 T4 T5 T6 T7 }
define_callable! { T1 T2 T3 T4 T5 T6 T7 T8 }

/// Conversion of a factory's return value into the registered contract.
///
/// Factories return either `Arc<T>` or `Result<Arc<T>, E>`; an error becomes
/// [`DiError::Factory`] unless it already is a [`DiError`].
pub trait IntoInstance<T: ?Sized> {
    fn into_instance(self, service: &'static str) -> DiResult<Arc<T>>;
}

impl<T: ?Sized> IntoInstance<T> for Arc<T> {
    #[inline]
    fn into_instance(self, _service: &'static str) -> DiResult<Arc<T>> {
        Ok(self)
    }
}

impl<T: ?Sized, E> IntoInstance<T> for Result<Arc<T>, E>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    #[inline]
    fn into_instance(self, service: &'static str) -> DiResult<Arc<T>> {
        self.map_err(|e| DiError::factory(service, e))
    }
}
