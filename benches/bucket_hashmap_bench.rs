//! Benchmark for BucketHashMap vs standard HashMap.
//!
//! Compares the chaining table against Rust's standard HashMap for common
//! operations, including the cost of growth from the default table size.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use duomap::map::BucketHashMap;
use std::collections::HashMap;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashmap_insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("BucketHashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map: BucketHashMap<u64, u64> = BucketHashMap::new();
                    for key in 0..size {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = HashMap::new();
                    for key in 0..size {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashmap_get");

    for size in [100, 1000, 10000] {
        let mut bucket_map: BucketHashMap<u64, u64> = BucketHashMap::new();
        let mut std_map = HashMap::new();
        for key in 0..size {
            bucket_map.insert(key, key * 2);
            std_map.insert(key, key * 2);
        }

        group.bench_with_input(
            BenchmarkId::new("BucketHashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for key in 0..size {
                        black_box(bucket_map.get(black_box(&key)));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for key in 0..size {
                        black_box(std_map.get(black_box(&key)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashmap_remove");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("BucketHashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || {
                        let mut map: BucketHashMap<u64, u64> = BucketHashMap::new();
                        for key in 0..size {
                            map.insert(key, key);
                        }
                        map
                    },
                    |mut map| {
                        for key in 0..size {
                            black_box(map.remove(black_box(&key)));
                        }
                        black_box(map)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// preallocated Benchmark
// =============================================================================

fn benchmark_preallocated_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("hashmap_insert_preallocated");

    for size in [1000u64, 10000] {
        group.bench_with_input(
            BenchmarkId::new("BucketHashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    // Sized so no growth happens during the run
                    let mut map: BucketHashMap<u64, u64> =
                        BucketHashMap::with_capacity((size as usize) * 2);
                    for key in 0..size {
                        map.insert(black_box(key), black_box(key));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_preallocated_insert
);
criterion_main!(benches);
