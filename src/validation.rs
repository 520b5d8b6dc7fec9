//! Lifetime validation of registered dependency manifests.
//!
//! Each factory's manifest is checked against the lifetime its dependencies
//! are registered with. A service must never depend on a contract with a
//! shorter lifetime than its own.
//!
//! # Validation Rules
//!
//! - **Singleton → Scoped**: Error
//! - **Singleton → Transient**: Error
//! - **Scoped → Transient**: Error
//! - **Transient → anything**, **Scoped → Scoped/Singleton**, **Singleton → Singleton**: OK
//! - **Missing required dependency**: Warning, resolution will fail with `NotFound`
//! - **Dependency cycle**: Warning, resolution will fail with `Circular`

use std::collections::HashSet;
use std::fmt;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::registration::Registry;
use crate::descriptors::ServiceDescriptor;
use crate::internal::Map;

/// A registration that depends on a contract it outlives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifetimeViolation {
    pub service: TypeKey,
    pub lifetime: Lifetime,
    pub dependency: TypeKey,
    pub dependency_lifetime: Lifetime,
}

impl fmt::Display for LifetimeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} depends on {} {}",
            self.lifetime, self.service, self.dependency_lifetime, self.dependency
        )
    }
}

impl From<LifetimeViolation> for DiError {
    fn from(v: LifetimeViolation) -> Self {
        DiError::InvalidDependencyLifetime {
            service: v.service.display_name(),
            lifetime: v.lifetime,
            dependency: v.dependency.display_name(),
            dependency_lifetime: v.dependency_lifetime,
        }
    }
}

/// A configuration that is allowed but will fail or misbehave at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A required (`Dep<T>`) parameter names a contract with no registration
    MissingDependency { service: TypeKey, dependency: TypeKey },
    /// Manifests form a cycle; the path starts and ends with the same contract
    Cycle(Vec<TypeKey>),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::MissingDependency { service, dependency } => {
                write!(f, "{} requires unregistered {}", service, dependency)
            }
            ValidationWarning::Cycle(path) => {
                let names: Vec<_> = path.iter().map(TypeKey::display_name).collect();
                write!(f, "dependency cycle: {}", names.join(" -> "))
            }
        }
    }
}

/// Result of [`Container::validate`](crate::Container::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Lifetime violations, sorted by service then dependency name
    pub errors: Vec<LifetimeViolation>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first violation as a [`DiError`], if any.
    pub fn into_result(self) -> DiResult<()> {
        match self.errors.into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }
}

pub(crate) fn validate(registry: &Registry) -> ValidationReport {
    let mut descriptors = registry.descriptors();
    let self_key = TypeKey::of::<Container>();
    let lifetimes: Map<TypeKey, Lifetime> = descriptors
        .iter()
        .map(|d| (d.key, d.lifetime))
        .chain(std::iter::once((self_key, Lifetime::Singleton)))
        .collect();

    let mut report = ValidationReport::default();
    for descriptor in &descriptors {
        for dependency in &descriptor.dependencies {
            match lifetimes.get(&dependency.key) {
                Some(&dependency_lifetime) if descriptor.lifetime.outlives(dependency_lifetime) => {
                    report.errors.push(LifetimeViolation {
                        service: descriptor.key,
                        lifetime: descriptor.lifetime,
                        dependency: dependency.key,
                        dependency_lifetime,
                    });
                }
                None if dependency.required => {
                    report.warnings.push(ValidationWarning::MissingDependency {
                        service: descriptor.key,
                        dependency: dependency.key,
                    });
                }
                _ => {}
            }
        }
    }

    report.errors.sort_by(|a, b| {
        (a.service.display_name(), a.dependency.display_name())
            .cmp(&(b.service.display_name(), b.dependency.display_name()))
    });

    descriptors.retain(|d| !d.is_instance);
    report.warnings.extend(find_cycles(&descriptors).into_iter().map(ValidationWarning::Cycle));
    report
}

fn find_cycles(descriptors: &[ServiceDescriptor]) -> Vec<Vec<TypeKey>> {
    let edges: Map<TypeKey, Vec<TypeKey>> = descriptors
        .iter()
        .map(|d| (d.key, d.dependencies.iter().map(|dep| dep.key).collect()))
        .collect();

    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();
    for descriptor in descriptors {
        visit(descriptor.key, &edges, &mut visited, &mut path, &mut cycles);
    }
    cycles
}

fn visit(
    current: TypeKey,
    edges: &Map<TypeKey, Vec<TypeKey>>,
    visited: &mut HashSet<TypeKey>,
    path: &mut Vec<TypeKey>,
    cycles: &mut Vec<Vec<TypeKey>>,
) {
    if let Some(start) = path.iter().position(|k| *k == current) {
        let mut cycle = path[start..].to_vec();
        cycle.push(current);
        cycles.push(cycle);
        return;
    }
    if !visited.insert(current) {
        return;
    }

    path.push(current);
    for next in edges.get(&current).into_iter().flatten() {
        visit(*next, edges, visited, path, cycles);
    }
    path.pop();
}
