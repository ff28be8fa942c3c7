#[macro_use]
extern crate criterion;

use criterion::Criterion;
use histgraph::{Bins, Histogram, Summary};

fn game_lengths(n: usize) -> Vec<f64> {
    // spread over the default bins, with a tail past the last edge
    (0..n).map(|i| ((i * 7919) % 1200) as f64).collect()
}

fn count_benchmark(c: &mut Criterion) {
    let bins = Bins::default();
    let data = game_lengths(100_000);
    c.bench_function("histogram count 100k", move |b| {
        b.iter(|| Histogram::count(&bins, &data))
    });
}

fn density_benchmark(c: &mut Criterion) {
    let histogram = Histogram::count(&Bins::default(), &game_lengths(100_000));
    c.bench_function("histogram density", move |b| b.iter(|| histogram.density()));
}

fn summary_benchmark(c: &mut Criterion) {
    let data = game_lengths(100_000);
    c.bench_function("summary 100k", move |b| b.iter(|| Summary::of(&data)));
}

criterion_group!(
    benches,
    count_benchmark,
    density_benchmark,
    summary_benchmark,
);
criterion_main!(benches);
