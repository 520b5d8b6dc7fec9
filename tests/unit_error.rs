use depinj::{DiError, Lifetime};
use std::error::Error;
use std::io;

#[test]
fn test_display_messages() {
    assert_eq!(DiError::ContainerLocked.to_string(), "Container is locked");
    assert_eq!(DiError::NotFound("app::Db").to_string(), "Service not found: app::Db");
    assert_eq!(
        DiError::NoActiveScope("app::Request").to_string(),
        "No active scope to resolve scoped service: app::Request"
    );
    assert_eq!(
        DiError::InvalidDependencyLifetime {
            service: "app::Cache",
            lifetime: Lifetime::Singleton,
            dependency: "app::Request",
            dependency_lifetime: Lifetime::Scoped,
        }
        .to_string(),
        "Invalid dependency lifetime: singleton app::Cache depends on scoped app::Request"
    );
    assert_eq!(
        DiError::Circular(vec!["A", "B", "A"]).to_string(),
        "Circular dependency: A -> B -> A"
    );
    assert_eq!(
        DiError::MissingArgument { index: 2, type_name: "u32" }.to_string(),
        "Missing argument 2 of type u32"
    );
    assert_eq!(DiError::DepthExceeded(8).to_string(), "Max depth 8 exceeded");
}

#[test]
fn test_factory_error_source() {
    let error = DiError::factory("app::Db", io::Error::new(io::ErrorKind::NotFound, "no socket"));

    assert_eq!(error.to_string(), "Factory for app::Db failed: no socket");
    let source = error.source().unwrap();
    assert_eq!(source.to_string(), "no socket");
    assert!(source.downcast_ref::<io::Error>().is_some());

    // Cloned errors share the source
    let clone = error.clone();
    assert!(clone.source().is_some());
}

#[test]
fn test_factory_keeps_di_errors() {
    let inner = DiError::NotFound("app::Config");
    assert!(matches!(DiError::factory("app::Db", inner), DiError::NotFound("app::Config")));
    assert!(DiError::NotFound("x").source().is_none());
}
