//! Benchmarks for seek predicate compilation and SQL rendering.
//!
//! Run with: cargo bench -p seekset-sql

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use seekset::{KeysetDefinition, Query, TraversalDirection, compile};
use seekset_sql::{is_valid_sql_identifier, postgres, sqlite};
use std::hint::black_box;

struct Event {
    id: i64,
    tenant: String,
    priority: Option<i64>,
    created: i64,
}

fn event() -> Event {
    Event {
        id: 4_812,
        tenant: "acme".to_string(),
        priority: Some(3),
        created: 1_700_000_000,
    }
}

fn keyset(columns: usize) -> KeysetDefinition<Event> {
    let mut builder = KeysetDefinition::<Event>::builder();
    if columns > 3 {
        builder = builder.ascending("tenant", |e| e.tenant.clone());
    }
    if columns > 2 {
        builder = builder.descending("priority", |e| e.priority);
    }
    if columns > 1 {
        builder = builder.descending("created", |e| e.created);
    }
    builder.ascending("id", |e| e.id).build().unwrap()
}

// =============================================================================
// Compilation Benchmarks
// =============================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let reference = event();

    for columns in [1, 2, 4] {
        let def = keyset(columns);
        group.bench_with_input(BenchmarkId::new("forward", columns), &def, |b, def| {
            b.iter(|| compile(black_box(def), TraversalDirection::Forward, Some(&reference)))
        });
        group.bench_with_input(BenchmarkId::new("backward", columns), &def, |b, def| {
            b.iter(|| compile(black_box(def), TraversalDirection::Backward, Some(&reference)))
        });
    }

    group.finish();
}

// =============================================================================
// Rendering Benchmarks
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let reference = event();
    let def = keyset(4);

    group.bench_function("postgres_seek", |b| {
        let table = postgres("events");
        b.iter(|| {
            let compiled = compile(&def, TraversalDirection::Forward, Some(&reference));
            table.select(black_box(&Query::seek(compiled, 50)))
        })
    });

    group.bench_function("sqlite_seek", |b| {
        let table = sqlite("events");
        b.iter(|| {
            let compiled = compile(&def, TraversalDirection::Backward, Some(&reference));
            table.select(black_box(&Query::seek(compiled, 50)))
        })
    });

    group.bench_function("sqlite_exists", |b| {
        let table = sqlite("events");
        let compiled = compile(&def, TraversalDirection::Forward, Some(&reference));
        b.iter(|| table.exists(black_box(&compiled.predicate)))
    });

    group.bench_function("identifier", |b| {
        b.iter(|| is_valid_sql_identifier(black_box("created_at")))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_render);
criterion_main!(benches);
