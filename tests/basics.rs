use depinj::{Container, Dep, DiError, Inject, Lifetime, Resolver, TypeKey};
use std::sync::{Arc, Mutex};

#[test]
fn test_concrete_singleton() {
    let container = Container::new();
    container.register_singleton_instance(Arc::new(42usize)).unwrap();
    container.register_singleton_instance(Arc::new("hello".to_string())).unwrap();

    let num1 = container.get_required::<usize>().unwrap();
    let num2 = container.get_required::<usize>().unwrap();
    let str1 = container.get_required::<String>().unwrap();
    let str2 = container.get_required::<String>().unwrap();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2)); // Same instance
    assert!(Arc::ptr_eq(&str1, &str2)); // Same instance
}

#[test]
fn test_factory_with_dependencies() {
    #[derive(Debug)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let container = Container::new();
    container.register_singleton_instance(Arc::new(Config { port: 8080 })).unwrap();
    container
        .register_singleton::<Server, _, _>(|config: Dep<Config>| {
            Arc::new(Server {
                config: config.into_inner(),
                name: "MyServer".to_string(),
            })
        })
        .unwrap();

    let server = container.get_required::<Server>().unwrap();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_lazy_singleton_runs_once() {
    let calls = Arc::new(Mutex::new(0));
    let calls_clone = calls.clone();

    let container = Container::new();
    container
        .register_singleton::<String, _, _>(move || {
            *calls_clone.lock().unwrap() += 1;
            Arc::new("built".to_string())
        })
        .unwrap();

    assert_eq!(*calls.lock().unwrap(), 0); // Not built at registration

    let a = container.get_required::<String>().unwrap();
    let b = container.get_required::<String>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let container = Container::new();
    container
        .register_transient::<String, _, _>(move || {
            let mut c = counter_clone.lock().unwrap();
            *c += 1;
            Arc::new(format!("instance-{}", *c))
        })
        .unwrap();

    let a = container.get_required::<String>().unwrap();
    let b = container.get_required::<String>().unwrap();

    assert_eq!(*a, "instance-1");
    assert_eq!(*b, "instance-2");
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_trait_contract_with_singleton_implementation() {
    trait Logger: Send + Sync {
        fn log(&self, message: &str) -> String;
    }

    struct ConsoleLogger;
    impl Logger for ConsoleLogger {
        fn log(&self, message: &str) -> String {
            format!("[LOG] {}", message)
        }
    }

    let container = Container::new();
    container
        .register_singleton::<dyn Logger, _, _>(|| Arc::new(ConsoleLogger) as Arc<dyn Logger>)
        .unwrap();

    let a = container.get_required::<dyn Logger>().unwrap();
    let b = container.get_required::<dyn Logger>().unwrap();
    assert_eq!(a.log("ready"), "[LOG] ready");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_unregistered_contract_is_no_binding() {
    struct Missing;

    let container = Container::new();

    assert!(container.get_instance::<Missing>().unwrap().is_none());
    match container.get_required::<Missing>() {
        Err(DiError::NotFound(name)) => assert!(name.contains("Missing")),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_reregistration_last_wins() {
    let container = Container::new();
    container.register_singleton_instance(Arc::new(1u32)).unwrap();
    container.register_transient::<u32, _, _>(|| Arc::new(2u32)).unwrap();

    assert_eq!(container.lifetime_of::<u32>(), Some(Lifetime::Transient));
    assert_eq!(*container.get_required::<u32>().unwrap(), 2);
    assert_eq!(container.descriptors().len(), 1);
}

#[test]
fn test_factory_error_propagates_and_is_not_cached() {
    #[derive(Debug)]
    struct Connection;

    let fail = Arc::new(Mutex::new(true));
    let fail_clone = fail.clone();

    let container = Container::new();
    container
        .register_singleton::<Connection, _, _>(move || {
            if *fail_clone.lock().unwrap() {
                Err("connection refused")
            } else {
                Ok(Arc::new(Connection))
            }
        })
        .unwrap();

    match container.get_instance::<Connection>() {
        Err(DiError::Factory { service, source }) => {
            assert!(service.contains("Connection"));
            assert_eq!(source.to_string(), "connection refused");
        }
        other => panic!("expected factory error, got {:?}", other.map(|_| ())),
    }

    *fail.lock().unwrap() = false;
    assert!(container.get_required::<Connection>().is_ok());
}

#[test]
fn test_optional_dependency_in_factory() {
    struct Metrics;
    struct Handler {
        metrics: Option<Arc<Metrics>>,
    }

    let container = Container::new();
    container
        .register_transient::<Handler, _, _>(|metrics: Inject<Metrics>| {
            Arc::new(Handler {
                metrics: metrics.into_inner(),
            })
        })
        .unwrap();

    assert!(container.get_required::<Handler>().unwrap().metrics.is_none());

    container.register_singleton_instance(Arc::new(Metrics)).unwrap();
    assert!(container.get_required::<Handler>().unwrap().metrics.is_some());
}

#[test]
fn test_container_resolves_itself() {
    struct Registry {
        container: Arc<Container>,
    }

    let container = Container::new();
    container
        .register_singleton::<Registry, _, _>(|c: Dep<Container>| {
            Arc::new(Registry {
                container: c.into_inner(),
            })
        })
        .unwrap();

    let registry = container.get_required::<Registry>().unwrap();
    assert!(registry.container.is_registered::<Registry>());
}

#[test]
fn test_independent_containers() {
    let a = Container::new();
    let b = Container::new();
    a.register_singleton_instance(Arc::new(1u8)).unwrap();

    assert!(a.get_instance::<u8>().unwrap().is_some());
    assert!(b.get_instance::<u8>().unwrap().is_none());

    let clone = a.clone();
    clone.register_singleton_instance(Arc::new(2u16)).unwrap();
    assert_eq!(*a.get_required::<u16>().unwrap(), 2); // Clones share the registry
}

#[test]
fn test_descriptor_lists_factory_dependencies() {
    struct Config;
    struct Audit;
    struct Server;

    let container = Container::new();
    container.register_singleton_instance(Arc::new(Config)).unwrap();
    container
        .register_transient::<Server, _, _>(|_c: Dep<Config>, _a: Inject<Audit>| Arc::new(Server))
        .unwrap();

    let descriptors = container.descriptors();
    let server = descriptors
        .iter()
        .find(|d| d.key == TypeKey::of::<Server>())
        .unwrap();
    assert_eq!(server.lifetime, Lifetime::Transient);
    assert!(server.depends_on(&TypeKey::of::<Config>()));
    assert!(server.depends_on(&TypeKey::of::<Audit>())); // Optional still counts
    assert!(!server.depends_on(&TypeKey::of::<Server>()));

    let config = descriptors
        .iter()
        .find(|d| d.key == TypeKey::of::<Config>())
        .unwrap();
    assert!(config.dependencies.is_empty());
    assert!(!config.depends_on(&TypeKey::of::<Server>()));
}
