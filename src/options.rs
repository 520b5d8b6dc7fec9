//! Container configuration.

/// Policy applied when a scope is opened while another scope is already
/// active for the same execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum NestedScopes {
    /// The new scope becomes active; closing it reactivates the outer one.
    #[default]
    Stack,
    /// Opening fails with [`DiError::ScopeAlreadyActive`](crate::DiError::ScopeAlreadyActive).
    Reject,
}

/// Tunables for a [`Container`](crate::Container).
///
/// With the `config` feature the options deserialize from host configuration;
/// missing fields keep their defaults.
///
/// # Examples
///
/// ```rust
/// use depinj::{Container, ContainerOptions, NestedScopes};
///
/// let options = ContainerOptions::default()
///     .with_max_depth(64)
///     .with_nested_scopes(NestedScopes::Reject);
///
/// let container = Container::with_options(options);
/// assert_eq!(container.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Maximum nesting of factory resolutions on one thread.
    pub max_depth: usize,
    /// What happens when a scope is opened inside an active one.
    pub nested_scopes: NestedScopes,
}

impl ContainerOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_nested_scopes(mut self, policy: NestedScopes) -> Self {
        self.nested_scopes = policy;
        self
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            nested_scopes: NestedScopes::default(),
        }
    }
}
