//! Error types for the dependency injection container.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::lifetime::Lifetime;

/// Dependency injection errors
///
/// A resolution that finds no registration is *not* an error:
/// [`Resolver::get_instance`](crate::Resolver::get_instance) returns
/// `Ok(None)` for it. Only [`Resolver::get_required`](crate::Resolver::get_required)
/// and required parameters turn a missing binding into [`DiError::NotFound`].
///
/// # Examples
///
/// ```rust
/// use depinj::{Container, DiError, Resolver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.validate_and_lock().unwrap();
///
/// match container.register_singleton_instance(Arc::new(42u32)) {
///     Err(DiError::ContainerLocked) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
///
/// assert!(container.get_instance::<String>().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Registration attempted after the container was locked
    ContainerLocked,
    /// Scoped service resolved with no scope open for the calling context
    NoActiveScope(&'static str),
    /// A registration depends on a contract that it outlives
    InvalidDependencyLifetime {
        service: &'static str,
        lifetime: Lifetime,
        dependency: &'static str,
        dependency_lifetime: Lifetime,
    },
    /// A scope was opened while another is active and nesting is rejected
    ScopeAlreadyActive,
    /// Service not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// A plain parameter had no supplied argument
    MissingArgument {
        index: usize,
        type_name: &'static str,
    },
    /// Circular dependency detected (includes path)
    ///
    /// Detection follows the resolution stack of the calling thread. If two
    /// threads start resolving a singleton cycle from different ends at the
    /// same time, each waits on the other's construction and neither sees a
    /// cycle, so they block. [`Container::validate`](crate::Container::validate)
    /// lists such cycles as [`ValidationWarning::Cycle`](crate::ValidationWarning::Cycle).
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// A factory returned an error
    Factory {
        service: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl DiError {
    /// Wraps an arbitrary factory failure for `service`.
    ///
    /// A `DiError` passed in is returned unchanged so that resolution errors
    /// raised inside factories keep their variant.
    pub fn factory<E>(service: &'static str, error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        match error.into().downcast::<DiError>() {
            Ok(inner) => *inner,
            Err(other) => DiError::Factory {
                service,
                source: Arc::from(other),
            },
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::ContainerLocked => write!(f, "Container is locked"),
            DiError::NoActiveScope(name) => {
                write!(f, "No active scope to resolve scoped service: {}", name)
            }
            DiError::InvalidDependencyLifetime {
                service,
                lifetime,
                dependency,
                dependency_lifetime,
            } => write!(
                f,
                "Invalid dependency lifetime: {} {} depends on {} {}",
                lifetime, service, dependency_lifetime, dependency
            ),
            DiError::ScopeAlreadyActive => write!(f, "A scope is already active"),
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::MissingArgument { index, type_name } => {
                write!(f, "Missing argument {} of type {}", index, type_name)
            }
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Factory { service, source } => {
                write!(f, "Factory for {} failed: {}", service, source)
            }
        }
    }
}

impl Error for DiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DiError::Factory { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
