/// Concurrent access integration tests
///
/// These tests verify single-flight construction of singleton and scoped
/// services and per-thread scope isolation under contention.

use crossbeam_utils::thread;
use depinj::{Container, Dep, Resolver};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

const THREADS: usize = 16;

#[derive(Debug)]
struct SlowService {
    id: usize,
}

#[test]
fn test_singleton_single_flight() {
    let builds = Arc::new(AtomicUsize::new(0));
    let builds_clone = builds.clone();

    let container = Container::new();
    container
        .register_singleton::<SlowService, _, _>(move || {
            std::thread::sleep(Duration::from_millis(20));
            Arc::new(SlowService {
                id: builds_clone.fetch_add(1, Ordering::SeqCst),
            })
        })
        .unwrap();
    container.validate_and_lock().unwrap();

    let barrier = Barrier::new(THREADS);
    let ids = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                barrier.wait();
                let service = container.get_required::<SlowService>().unwrap();
                ids.lock().unwrap().push(Arc::as_ptr(&service) as usize);
            });
        }
    })
    .unwrap();

    let ids = ids.into_inner().unwrap();
    assert_eq!(ids.len(), THREADS);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 1);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shared_explicit_scope_single_flight() {
    let builds = Arc::new(AtomicUsize::new(0));
    let builds_clone = builds.clone();

    let container = Container::new();
    container
        .register_scoped::<SlowService, _, _>(move || {
            std::thread::sleep(Duration::from_millis(10));
            Arc::new(SlowService {
                id: builds_clone.fetch_add(1, Ordering::SeqCst),
            })
        })
        .unwrap();

    let scope = container.create_scope();
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                barrier.wait();
                scope.get_required::<SlowService>().unwrap().id
            });
        }
    })
    .unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_each_thread_gets_its_own_ambient_scope() {
    let builds = Arc::new(AtomicUsize::new(0));
    let builds_clone = builds.clone();

    let container = Container::new();
    container
        .register_scoped::<SlowService, _, _>(move || {
            Arc::new(SlowService {
                id: builds_clone.fetch_add(1, Ordering::SeqCst),
            })
        })
        .unwrap();

    let barrier = Barrier::new(THREADS);
    let ids = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                let _scope = container.open_scope().unwrap();
                barrier.wait();
                let a = container.get_required::<SlowService>().unwrap();
                let b = container.get_required::<SlowService>().unwrap();
                assert!(Arc::ptr_eq(&a, &b));
                ids.lock().unwrap().push(a.id);
            });
        }
    })
    .unwrap();

    let ids = ids.into_inner().unwrap();
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), THREADS);
    assert_eq!(builds.load(Ordering::SeqCst), THREADS);
}

#[test]
fn test_concurrent_dependency_graph() {
    struct Pool;
    struct Repository {
        pool: Arc<Pool>,
    }

    let container = Container::new();
    container.register_singleton::<Pool, _, _>(|| Arc::new(Pool)).unwrap();
    container
        .register_transient::<Repository, _, _>(|pool: Dep<Pool>| {
            Arc::new(Repository {
                pool: pool.into_inner(),
            })
        })
        .unwrap();
    container.validate_and_lock().unwrap();

    let pool = container.get_required::<Pool>().unwrap();
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                for _ in 0..100 {
                    let repo = container.get_required::<Repository>().unwrap();
                    assert!(Arc::ptr_eq(&repo.pool, &pool));
                }
            });
        }
    })
    .unwrap();
}
