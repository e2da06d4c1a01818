use criterion::{black_box, BatchSize, BenchmarkId, Criterion};
use criterion::{criterion_group, criterion_main};

use biosignal::{Clock, MemoryStore, Recording, TimeSeries};

const APPENDS_PER_ITER: usize = 100;

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for &size in &[64_usize, 1024, 16_384] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut rec = Recording::open(Box::new(MemoryStore::new("bench"))).expect("open");
                    rec.new_signal("bench/signal/0", None, Clock::uniform(1000.0).expect("clock"))
                        .expect("signal");
                    let series = TimeSeries::uniform(vec![0.5; size], 1000.0).expect("series");
                    (rec, series)
                },
                |(mut rec, series)| {
                    let signal = rec.signal_mut("bench/signal/0").expect("signal");
                    for _ in 0..APPENDS_PER_ITER {
                        signal.append(black_box(&series)).expect("append");
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
