//! B+Tree 인덱스 벤치마크
//!
//! 실행: cargo bench --bench index_bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use tabledb_core::BPlusTree;

fn shuffled_keys(count: usize) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..count as i64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn build(keys: &[i64]) -> BPlusTree {
    let mut tree = BPlusTree::new();
    for (pos, &k) in keys.iter().enumerate() {
        tree.insert(k, pos).unwrap();
    }
    tree
}

// ════════════════════════════════════════════
// Insert
// ════════════════════════════════════════════

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_insert");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, &size| {
            let keys: Vec<i64> = (0..size as i64).collect();
            b.iter(|| black_box(build(black_box(&keys))));
        });

        group.bench_with_input(BenchmarkId::new("shuffled", size), size, |b, &size| {
            let keys = shuffled_keys(size);
            b.iter(|| black_box(build(black_box(&keys))));
        });
    }

    group.finish();
}

// ════════════════════════════════════════════
// Point search / range search
// ════════════════════════════════════════════

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_search");

    for size in [1_000, 100_000].iter() {
        let keys = shuffled_keys(*size);
        let tree = build(&keys);

        group.bench_with_input(BenchmarkId::new("point", size), size, |b, _| {
            b.iter(|| {
                for &k in keys.iter().take(1_000) {
                    black_box(tree.search(black_box(k)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("range_1pct", size), size, |b, &size| {
            let width = (size / 100) as i64;
            b.iter(|| black_box(tree.range_search(black_box(10), black_box(10 + width))));
        });
    }

    group.finish();
}

// ════════════════════════════════════════════
// Remove
// ════════════════════════════════════════════

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_remove");
    group.sample_size(20);

    let size = 10_000;
    let keys = shuffled_keys(size);
    group.bench_function("remove_all_shuffled", |b| {
        b.iter_batched(
            || build(&keys),
            |mut tree| {
                for &k in &keys {
                    black_box(tree.remove(k));
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove);
criterion_main!(benches);
