//! Query engine benchmark: index-accelerated scan vs full scan, join, SQL path.
//!
//! 실행: cargo bench --bench engine_bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tabledb_core::{
    Column, DataType, Database, EngineConfig, JoinPredicate, Predicate, Projection, Value,
};

fn populated(size: usize, index_scan: bool) -> Database {
    let mut db =
        Database::with_config(EngineConfig::default().with_index_scan(index_scan)).unwrap();
    db.create_table(
        "users",
        vec![
            Column::primary_key("id", DataType::Integer),
            Column::new("name", DataType::Text),
            Column::new("score", DataType::Float),
        ],
    )
    .unwrap();
    let rows = (0..size as i64)
        .map(|i| {
            vec![
                Value::Integer(i),
                Value::Text(format!("user{i}")),
                Value::Float((i % 100) as f64 / 10.0),
            ]
        })
        .collect();
    db.insert_rows("users", rows).unwrap();
    db
}

// ════════════════════════════════════════════
// SELECT: index scan vs full scan
// ════════════════════════════════════════════

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_range");

    for size in [1_000, 10_000, 100_000].iter() {
        let indexed = populated(*size, true);
        let full = populated(*size, false);
        let preds = [
            Predicate::gt_eq("id", (*size / 2) as i64),
            Predicate::lt("id", (*size / 2 + 50) as i64),
        ];

        group.bench_with_input(BenchmarkId::new("index_scan", size), size, |b, _| {
            b.iter(|| black_box(indexed.select("users", black_box(&preds), &Projection::All)));
        });
        group.bench_with_input(BenchmarkId::new("full_scan", size), size, |b, _| {
            b.iter(|| black_box(full.select("users", black_box(&preds), &Projection::All)));
        });
    }

    group.finish();
}

// ════════════════════════════════════════════
// DELETE (locator repair cost)
// ════════════════════════════════════════════

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    group.sample_size(20);

    for size in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("front_row", size), size, |b, &size| {
            b.iter_batched(
                || populated(size, true),
                |mut db| black_box(db.delete_rows("users", &[Predicate::eq("id", 0)])),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ════════════════════════════════════════════
// JOIN / SQL
// ════════════════════════════════════════════

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");
    group.sample_size(20);

    for size in [100, 1_000].iter() {
        let mut db = populated(*size, true);
        db.create_table(
            "orders",
            vec![
                Column::primary_key("id", DataType::Integer),
                Column::new("user_id", DataType::Integer),
            ],
        )
        .unwrap();
        let orders = (0..*size as i64)
            .map(|i| vec![Value::Integer(i), Value::Integer(i % 10)])
            .collect();
        db.insert_rows("orders", orders).unwrap();
        let on = [JoinPredicate::new("users", "id", "orders", "user_id")];

        group.bench_with_input(BenchmarkId::new("nested_loop", size), size, |b, _| {
            b.iter(|| black_box(db.select_join("users", "orders", &on, &[], &Projection::All)));
        });
    }

    group.finish();
}

fn bench_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql");
    let mut db = populated(10_000, true);

    group.bench_function("select_where", |b| {
        b.iter(|| {
            black_box(db.execute_sql(black_box(
                "SELECT id, name FROM users WHERE id >= 5000 AND id < 5050",
            )))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_select, bench_delete, bench_join, bench_sql);
criterion_main!(benches);
