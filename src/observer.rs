//! Diagnostic observers for dependency injection traceability.
//!
//! Observers receive a callback around every resolution that finds a
//! registration. "No binding" outcomes are not reported.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// Observer trait for dependency injection resolution events.
///
/// Calls are made synchronously on the resolving thread; keep them cheap.
///
/// # Examples
///
/// ```
/// use depinj::{Container, DiError, DiObserver, Lifetime, Resolver, TypeKey};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolved: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolved(&self, _key: &TypeKey, _lifetime: Lifetime, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn failed(&self, _key: &TypeKey, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let container = Container::new();
/// container.add_observer(observer.clone()).unwrap();
/// container.register_singleton_instance(Arc::new(7u8)).unwrap();
///
/// container.get_required::<u8>().unwrap();
/// assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a registered service is looked up or constructed.
    fn resolving(&self, _key: &TypeKey, _lifetime: Lifetime) {}

    /// Called when a service was resolved, with the time spent.
    fn resolved(&self, key: &TypeKey, lifetime: Lifetime, duration: Duration);

    /// Called when resolution of a registered service failed.
    fn failed(&self, key: &TypeKey, error: &DiError);
}

/// Collection of observers attached to a container.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn with(&self, observer: Arc<dyn DiObserver>) -> Self {
        let mut observers = self.observers.clone();
        observers.push(observer);
        Self { observers }
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &TypeKey, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.resolving(key, lifetime);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &TypeKey, lifetime: Lifetime, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, lifetime, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &TypeKey, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolutions are emitted at `TRACE`, failures at `WARN`, all under the
/// `depinj::resolve` target.
///
/// ```
/// use depinj::{Container, TracingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(TracingObserver::new())).unwrap();
/// ```
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            label: "depinj".to_string(),
        }
    }

    /// Creates an observer whose events carry `label`, useful when several
    /// containers log to one subscriber.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &TypeKey, lifetime: Lifetime) {
        tracing::trace!(
            target: "depinj::resolve",
            container = %self.label,
            service = key.display_name(),
            %lifetime,
            "resolving"
        );
    }

    fn resolved(&self, key: &TypeKey, lifetime: Lifetime, duration: Duration) {
        tracing::trace!(
            target: "depinj::resolve",
            container = %self.label,
            service = key.display_name(),
            %lifetime,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &TypeKey, error: &DiError) {
        tracing::warn!(
            target: "depinj::resolve",
            container = %self.label,
            service = key.display_name(),
            %error,
            "resolution failed"
        );
    }
}
