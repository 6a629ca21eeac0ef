use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrusim::LruCache;

fn bench_read_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("read_hit_1000", |b| {
        let mut cache = LruCache::new(1000).unwrap();

        // Pre-populate
        for key in 0..1000u64 {
            cache.write(key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.read(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = LruCache::new(1000).unwrap();

        for key in 0..1000u64 {
            cache.write(key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.read(&(counter % 2000)));
            } else {
                black_box(cache.write(counter % 2000));
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_write_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("write_miss_evict", |b| {
        let mut cache = LruCache::new(10).unwrap(); // Small cache

        // Every write is a fresh key, so every write past the tenth evicts
        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.write(counter));
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_read_hit,
    bench_mixed_50_50,
    bench_write_evict
);
criterion_main!(benches);
