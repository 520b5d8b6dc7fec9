use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depinj::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::new();
    container.register_singleton_instance(Arc::new(42u64)).unwrap();
    container.validate_and_lock().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get_instance::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                container
                    .register_singleton::<ExpensiveToCreate, _, _>(|| {
                        Arc::new(ExpensiveToCreate {
                            data: (0..1000).collect(),
                        })
                    })
                    .unwrap();
                container
            },
            |container| {
                let v = container.get_required::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_scoped_vs_transient(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    let mut group = c.benchmark_group("scoped_vs_transient");

    let scoped = Container::new();
    scoped.register_scoped::<Service, _, _>(|| Arc::new(Service { data: [0; 64] })).unwrap();
    let scope = scoped.create_scope();
    scope.get_required::<Service>().unwrap();

    group.bench_function("scoped_hit", |b| {
        b.iter(|| black_box(scope.get_required::<Service>().unwrap().data[0]))
    });

    let transient = Container::new();
    transient.register_transient::<Service, _, _>(|| Arc::new(Service { data: [0; 64] })).unwrap();

    group.bench_function("transient", |b| {
        b.iter(|| black_box(transient.get_required::<Service>().unwrap().data[0]))
    });

    group.bench_function("open_scope_and_resolve", |b| {
        b.iter(|| {
            let _guard = scoped.open_scope().unwrap();
            black_box(scoped.get_required::<Service>().unwrap().data[0])
        })
    });

    group.finish();
}

fn bench_invoke(c: &mut Criterion) {
    trait Greeter: Send + Sync {
        fn greet(&self, name: &str) -> usize;
    }
    struct Counter;
    impl Greeter for Counter {
        fn greet(&self, name: &str) -> usize {
            name.len()
        }
    }

    let container = Container::new();
    container
        .register_singleton::<dyn Greeter, _, _>(|| Arc::new(Counter) as Arc<dyn Greeter>)
        .unwrap();

    let direct = container.inject(|greeter: Dep<dyn Greeter>, name: Arg<&'static str>| greeter.greet(&name));
    let scoped = container.scoped_inject(|greeter: Dep<dyn Greeter>, name: Arg<&'static str>| greeter.greet(&name));

    let mut group = c.benchmark_group("invoke");
    group.bench_function("inject", |b| {
        b.iter(|| black_box(direct.call(Arguments::new().with(1, "bench")).unwrap()))
    });
    group.bench_function("scoped_inject", |b| {
        b.iter(|| black_box(scoped.call(Arguments::new().with(1, "bench")).unwrap()))
    });
    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_dependency_chain(c: &mut Criterion) {
    struct Level<const N: usize>;

    let container = Container::new();
    container.register_transient::<Level<0>, _, _>(|| Arc::new(Level::<0>)).unwrap();
    container.register_transient::<Level<1>, _, _>(|_d: Dep<Level<0>>| Arc::new(Level::<1>)).unwrap();
    container.register_transient::<Level<2>, _, _>(|_d: Dep<Level<1>>| Arc::new(Level::<2>)).unwrap();
    container.register_transient::<Level<3>, _, _>(|_d: Dep<Level<2>>| Arc::new(Level::<3>)).unwrap();
    container.register_transient::<Level<4>, _, _>(|_d: Dep<Level<3>>| Arc::new(Level::<4>)).unwrap();
    container.validate_and_lock().unwrap();

    c.bench_function("transient_chain_depth_5", |b| {
        b.iter(|| black_box(container.get_required::<Level<4>>().unwrap()))
    });
}

fn bench_contended_singleton(c: &mut Criterion) {
    let container = Container::new();
    container.register_singleton::<String, _, _>(|| Arc::new("shared".to_string())).unwrap();
    container.validate_and_lock().unwrap();

    let mut group = c.benchmark_group("contended_singleton");
    for threads in [1usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                crossbeam_utils::thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|_| {
                            for _ in 0..100 {
                                black_box(container.get_required::<String>().unwrap());
                            }
                        });
                    }
                })
                .unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_scoped_vs_transient,
    bench_invoke
);

criterion_group!(macro_benches, bench_dependency_chain, bench_contended_singleton);

criterion_main!(micro_benches, macro_benches);
