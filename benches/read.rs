use criterion::{black_box, BenchmarkId, Criterion};
use criterion::{criterion_group, criterion_main};

use biosignal::{MemoryStore, ReadRequest, Recording};

const SAMPLES: usize = 1_000_000;

fn bench_read(c: &mut Criterion) {
    let store = MemoryStore::new("bench");
    store
        .insert_uniform("bench/signal/0", None, 1000.0, vec![0.25; SAMPLES])
        .expect("insert");
    let rec = Recording::open(Box::new(store)).expect("open");
    let signal = rec.signal("bench/signal/0").expect("signal");

    let mut group = c.benchmark_group("read");
    for &points in &[1_024_usize, 16_384, 50_000] {
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, &points| {
            b.iter(|| {
                let request = ReadRequest::new().max_points(points);
                let mut total = 0;
                for segment in signal.read(&request).expect("read") {
                    total += segment.expect("segment").len();
                }
                black_box(total)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read);
criterion_main!(benches);
