//! Performance benchmarks for the form store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formstore::{FieldSchema, FormContext, FormStore, HandleProtocol, Schema, SchemaEngine, Value};

fn create_store(fields: usize) -> FormStore<FormContext> {
    let schema = (0..fields).fold(Schema::new(), |schema, i| {
        schema.field(format!("field_{}", i), FieldSchema::string().min_length(3, "3!"))
    });
    FormStore::new(&SchemaEngine, schema, None).unwrap()
}

/// Benchmark snapshot reads with and without an intervening write
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for fields in [2, 20, 200] {
        let store = create_store(fields);

        group.bench_with_input(BenchmarkId::new("cached", fields), &fields, |b, _| {
            b.iter(|| black_box(store.get_snapshot()));
        });

        let ops = store.get_snapshot();
        group.bench_with_input(BenchmarkId::new("after_write", fields), &fields, |b, _| {
            b.iter(|| {
                ops.assign("field_0", "abc").unwrap();
                black_box(store.get_snapshot())
            });
        });
    }

    group.finish();
}

/// Benchmark a single write fanning out to many listeners
fn bench_write_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_fan_out");

    for listeners in [0, 10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("listeners", listeners),
            &listeners,
            |b, &count| {
                let reactive = HandleProtocol::new();
                let handle = reactive.create();
                let subs: Vec<_> = (0..count)
                    .map(|_| reactive.subscribe(|| {}))
                    .collect();

                b.iter(|| reactive.set(handle, black_box(Value::from(1))).unwrap());

                for sub in subs {
                    sub.unsubscribe();
                }
            },
        );
    }

    group.finish();
}

/// Benchmark the shallow copy taken on list writes
fn bench_list_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_write");

    for len in [10, 1000, 10000] {
        let list = Value::from((0..len).map(Value::from).collect::<Vec<_>>());
        group.bench_with_input(BenchmarkId::new("len", len), &list, |b, list| {
            let reactive = HandleProtocol::new();
            let handle = reactive.create();
            b.iter(|| reactive.set(handle, list.clone()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_snapshot, bench_write_fan_out, bench_list_write);
criterion_main!(benches);
