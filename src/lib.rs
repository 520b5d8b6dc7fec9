//! # depinj
//!
//! Type-keyed dependency injection with singleton, scoped and transient
//! lifetimes, automatic parameter binding and lifetime validation.
//!
//! ## Features
//!
//! - **Type-keyed contracts**: concrete types and trait objects (`dyn Trait`) alike
//! - **Three lifetimes**: Singleton, Scoped, and Transient services
//! - **Single-flight caching**: a singleton or scoped factory runs once, even under contention
//! - **Automatic binding**: factories and plain functions declare what they need
//!   through their parameter types ([`Dep`], [`Inject`], [`Arg`])
//! - **Lifetime validation**: a singleton can never capture a scoped or transient instance
//! - **Context-local scopes**: one active scope per thread, or an explicit [`Scope`]
//!   carried into async tasks
//!
//! ## Quick Start
//!
//! ```rust
//! use depinj::{Container, Dep, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container.register_singleton_instance(Arc::new(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! })).unwrap();
//! container.register_transient::<UserService, _, _>(|db: Dep<Database>| {
//!     Arc::new(UserService { db: db.into_inner() })
//! }).unwrap();
//! container.validate_and_lock().unwrap();
//!
//! let user_service = container.get_required::<UserService>().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: created once, shared for the life of the container
//! - **Scoped**: created once per scope (ideal for request contexts)
//! - **Transient**: created fresh on every resolution
//!
//! A service may depend only on contracts that live at least as long as it
//! does; [`Container::validate_and_lock`] enforces this before the registry is
//! frozen.
//!
//! ## Scoped Services
//!
//! ```rust
//! use depinj::{Container, Resolver};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! struct RequestId(u32);
//!
//! let counter = Arc::new(AtomicU32::new(0));
//! let container = Container::new();
//! container.register_scoped::<RequestId, _, _>(move || {
//!     Arc::new(RequestId(counter.fetch_add(1, Ordering::SeqCst)))
//! }).unwrap();
//!
//! let first = {
//!     let _scope = container.open_scope().unwrap();
//!     let a = container.get_required::<RequestId>().unwrap();
//!     let b = container.get_required::<RequestId>().unwrap();
//!     assert!(Arc::ptr_eq(&a, &b));
//!     a.0
//! };
//!
//! let _scope = container.open_scope().unwrap();
//! assert_ne!(container.get_required::<RequestId>().unwrap().0, first);
//! ```
//!
//! ## Injected Functions
//!
//! ```rust
//! use depinj::{Arg, Arguments, Container, Dep};
//! use std::sync::Arc;
//!
//! struct Prefix(String);
//!
//! let container = Container::new();
//! container.register_singleton_instance(Arc::new(Prefix("> ".into()))).unwrap();
//!
//! let render = container.scoped_inject(|prefix: Dep<Prefix>, line: Arg<&'static str>| {
//!     format!("{}{}", prefix.0, *line)
//! });
//! assert_eq!(render.call(Arguments::new().with(1, "hi")).unwrap(), "> hi");
//! ```

pub mod container;
pub mod descriptors;
pub mod error;
pub mod invoke;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod options;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use container::{Container, ResolverContext, Scope, ScopeGuard};
pub use descriptors::{Dependency, ServiceDescriptor};
pub use error::{DiError, DiResult};
pub use invoke::{Arg, Arguments, Callable, Dep, Inject, Injected, IntoInstance, Parameter};
pub use key::{key_of_type, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, TracingObserver};
pub use options::{ContainerOptions, NestedScopes};
pub use traits::{Resolver, ResolverCore};
pub use validation::{LifetimeViolation, ValidationReport, ValidationWarning};
