//! Contract keys for the dependency injection container.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key identifying a registered contract.
///
/// A contract is whatever type callers resolve: a concrete struct, a
/// primitive, or a trait object such as `dyn Greeter`. Equality and hashing
/// use the `TypeId` only; the type name is carried for diagnostics.
///
/// # Examples
///
/// ```rust
/// use depinj::TypeKey;
///
/// trait Greeter: Send + Sync {}
///
/// let a = TypeKey::of::<dyn Greeter>();
/// let b = TypeKey::of::<dyn Greeter>();
/// assert_eq!(a, b);
/// assert_ne!(a, TypeKey::of::<String>());
/// assert!(a.display_name().contains("Greeter"));
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the contract `T`. Works for unsized contracts like `dyn Trait`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human readable type name, as reported by `std::any::type_name`.
    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::of::<T>()
}
