//! Benchmarks simulating real allocation patterns against `SegPoolAllocator`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use segpool::SegPoolAllocator;

/// Plain alloc/free cycles against a single pool — the hot path with no
/// resolver overhead.
fn bench_single_pool_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_pool_cycle");
    group.throughput(Throughput::Elements(1));

    group.bench_function("alloc_free", |b| {
        let mut pool = SegPoolAllocator::new();
        pool.init(&[64]).unwrap();

        b.iter(|| {
            let p = pool.alloc(64);
            black_box(p);
            pool.free(p);
        });
    });

    group.finish();
}

/// Request/response style: two allocations of different sizes, then freed
/// in reverse order, mirroring the S1 scenario's shape.
fn bench_request_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_response");
    group.throughput(Throughput::Elements(1));

    group.bench_function("two_sizes_lifo", |b| {
        let mut pool = SegPoolAllocator::new();
        pool.init(&[32, 256, 4096]).unwrap();

        b.iter(|| {
            let req = pool.alloc(32);
            let resp = pool.alloc(256);
            black_box((req, resp));
            pool.free(resp);
            pool.free(req);
        });
    });

    group.finish();
}

/// The size-to-pool resolver's binary search + overflow path, exercised
/// across a wide pool table with every ideal pool kept near capacity so the
/// cache can't trivially short-circuit the search.
fn bench_resolver_under_pressure(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");

    let sizes: Vec<usize> = (1..=31).map(|i| i * 64).collect();

    group.bench_function("varied_sizes_31_pools", |b| {
        let mut pool = SegPoolAllocator::new();
        pool.init(&sizes).unwrap();

        b.iter(|| {
            let mut outstanding = Vec::with_capacity(sizes.len());
            for &size in &sizes {
                outstanding.push(pool.alloc(size - 1));
            }
            black_box(&outstanding);
            for p in outstanding {
                pool.free(p);
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_pool_cycle,
    bench_request_response,
    bench_resolver_under_pressure
);
criterion_main!(benches);
