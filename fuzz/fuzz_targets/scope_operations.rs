#![no_main]

use depinj::{Container, DiError, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct Counter(u64);
struct Shared;

// Each byte is one operation against a container that mirrors its active
// scope stack; every resolution is checked against the model.
fuzz_target!(|data: &[u8]| {
    let next = Arc::new(AtomicU64::new(0));
    let container = Container::new();
    let counter = next.clone();
    if container
        .register_scoped::<Counter, _, _>(move || Arc::new(Counter(counter.fetch_add(1, Ordering::SeqCst))))
        .is_err()
        || container.register_singleton::<Shared, _, _>(|| Arc::new(Shared)).is_err()
    {
        return;
    }

    let mut guards = Vec::new();
    let mut seen: Vec<Option<u64>> = Vec::new();

    for byte in data.iter().take(256) {
        match byte % 5 {
            0 => {
                if let Ok(guard) = container.open_scope() {
                    guards.push(guard);
                    seen.push(None);
                }
            }
            1 => {
                guards.pop();
                seen.pop();
            }
            2 => match container.get_instance::<Counter>() {
                Ok(Some(instance)) => {
                    let slot = seen.last_mut().expect("resolved without an open scope");
                    match slot {
                        Some(id) => assert_eq!(*id, instance.0),
                        None => *slot = Some(instance.0),
                    }
                }
                Err(DiError::NoActiveScope(_)) => assert!(guards.is_empty()),
                other => panic!("unexpected resolution: {:?}", other.map(|_| ())),
            },
            3 => {
                let a = container.get_required::<Shared>().expect("singleton resolves");
                let b = container.get_required::<Shared>().expect("singleton resolves");
                assert!(Arc::ptr_eq(&a, &b));
            }
            _ => {
                let closed = container.close_scope();
                assert_eq!(closed, !guards.is_empty());
                if closed {
                    seen.pop();
                    // The guard of a scope closed by hand is inert on drop.
                    drop(guards.pop());
                }
            }
        }
        assert_eq!(container.current_scope().map(|s| s.id()), guards.last().map(|g| g.id()));
    }
});
