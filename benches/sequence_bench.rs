use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use temporal_sequencer::{Granularity, Sequencer, TemporalRecord};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// Records spread over roughly a year, several per hour, inserted unsorted.
fn build_records(n: usize) -> Vec<TemporalRecord> {
    (0..n)
        .map(|i| {
            let minutes = ((i * 7_919) % (n.max(1) * 13)) as i64;
            TemporalRecord::new(base() + Duration::minutes(minutes), format!("{}", 1_000_000 + i))
        })
        .collect()
}

fn build_sequencer(n: usize) -> Sequencer {
    let mut seq = Sequencer::new();
    seq.extend(build_records(n));
    seq
}

pub fn bench_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");

    for size in [1_000, 10_000, 100_000] {
        for granularity in [Granularity::None, Granularity::Day, Granularity::Minute] {
            group.bench_with_input(
                BenchmarkId::new(granularity.as_str(), size),
                &size,
                |b, &n| {
                    b.iter_batched(
                        || build_sequencer(n),
                        |mut seq| {
                            seq.sequence(granularity, false);
                            black_box(seq)
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

pub fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for size in [1_000, 10_000] {
        let mut seq = build_sequencer(size);
        seq.sequence(Granularity::None, false);

        group.bench_with_input(BenchmarkId::new("fresh", size), &size, |b, _| {
            b.iter(|| black_box(seq.serialize(Granularity::None, false).unwrap()));
        });
    }

    group.finish();
}

pub fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for size in [1_000, 10_000] {
        let text = build_sequencer(size)
            .serialize(Granularity::None, false)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("line", size), &text, |b, t| {
            b.iter(|| black_box(Sequencer::read(black_box(t), '\t').unwrap()));
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_sequence(c);
    bench_serialize(c);
    bench_read(c);
}
