use criterion::{criterion_group, criterion_main};

mod sequence_bench;

criterion_group!(benches, sequence_bench::register_benchmarks);
criterion_main!(benches);
