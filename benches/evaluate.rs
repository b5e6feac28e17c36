use std::{hint::black_box, iter::repeat_with, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, StringArray},
    record_batch::RecordBatch,
};
use colfilter::{all_of, either, not, number_column, string_column, Filter};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const RNG_SEED: u64 = 3;

fn make_batch(rows: usize) -> RecordBatch {
    let mut rng = fastrand::Rng::with_seed(RNG_SEED);
    let ages: Vec<Option<i32>> = (0..rows)
        .map(|_| (rng.u8(0..20) != 0).then(|| rng.i32(0..100)))
        .collect();
    let scores: Vec<f64> = (0..rows).map(|_| rng.f64() * 100.0).collect();
    let names: Vec<String> = (0..rows)
        .map(|_| repeat_with(|| rng.alphanumeric()).take(8).collect())
        .collect();
    RecordBatch::try_from_iter(vec![
        ("age", Arc::new(Int32Array::from(ages)) as ArrayRef),
        ("score", Arc::new(Float64Array::from(scores)) as ArrayRef),
        ("name", Arc::new(StringArray::from(names)) as ArrayRef),
    ])
    .unwrap()
}

fn make_filter() -> Filter {
    all_of([
        number_column("age").is_between_inclusive(18.0, 65.0),
        either(
            number_column("score").is_greater_than(50.0),
            string_column("name").starts_with("a"),
        ),
        not(number_column("age").is_in([30.0, 40.0])),
    ])
    .unwrap()
}

fn evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let filter = make_filter();

    for rows in [1_024, 65_536, 1_048_576] {
        let batch = make_batch(rows);
        group.bench_with_input(BenchmarkId::new("tree", rows), &batch, |b, batch| {
            b.iter(|| black_box(filter.evaluate(batch).unwrap()));
        });
        let leaf = number_column("score").is_less_than(25.0);
        group.bench_with_input(BenchmarkId::new("leaf", rows), &batch, |b, batch| {
            b.iter(|| black_box(leaf.evaluate(batch).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, evaluate);
criterion_main!(benches);
