use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use jsontree::{OrderPreservingObject, SortedObject, Value};

fn shuffled_keys(size: usize) -> Vec<String> {
    // neither backend gets its favourite insertion order
    let mut keys: Vec<String> = (0..size).map(|i| format!("object_key_{:05}", i)).collect();
    for i in 0..size {
        keys.swap(i, (i * 7919) % size);
    }
    keys
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_from_pairs");
    for size in [8, 64, 512, 4096] {
        let keys = shuffled_keys(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sorted", size), &keys, |b, keys| {
            b.iter(|| {
                keys.iter()
                    .enumerate()
                    .map(|(i, k)| (k.as_str(), i))
                    .collect::<SortedObject>()
            })
        });
        group.bench_with_input(BenchmarkId::new("order_preserving", size), &keys, |b, keys| {
            b.iter(|| {
                keys.iter()
                    .enumerate()
                    .map(|(i, k)| (k.as_str(), i))
                    .collect::<OrderPreservingObject>()
            })
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_one_by_one");
    for size in [8, 64, 512] {
        let keys = shuffled_keys(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sorted", size), &keys, |b, keys| {
            b.iter(|| {
                let mut obj = SortedObject::new();
                for (i, k) in keys.iter().enumerate() {
                    obj.insert_or_assign(k.as_str(), Value::from(i));
                }
                obj
            })
        });
        group.bench_with_input(BenchmarkId::new("order_preserving", size), &keys, |b, keys| {
            b.iter(|| {
                let mut obj = OrderPreservingObject::new();
                for (i, k) in keys.iter().enumerate() {
                    obj.insert_or_assign(k.as_str(), Value::from(i));
                }
                obj
            })
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in [8, 64, 512, 4096] {
        let keys = shuffled_keys(size);
        let sorted: SortedObject = keys.iter().map(|k| (k.as_str(), 0)).collect();
        let preserved: OrderPreservingObject = keys.iter().map(|k| (k.as_str(), 0)).collect();
        let probe = keys[size / 2].clone();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("sorted", size), &probe, |b, key| {
            b.iter(|| sorted.get(key).is_some())
        });
        group.bench_with_input(BenchmarkId::new("order_preserving", size), &probe, |b, key| {
            b.iter(|| preserved.get(key).is_some())
        });
    }
    group.finish();
}

fn bench_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_half");
    for size in [64, 512] {
        let keys = shuffled_keys(size);
        let sorted: SortedObject = keys.iter().map(|k| (k.as_str(), 0)).collect();
        let preserved: OrderPreservingObject = keys.iter().map(|k| (k.as_str(), 0)).collect();
        let doomed = &keys[..size / 2];

        group.bench_with_input(BenchmarkId::new("sorted", size), doomed, |b, doomed| {
            b.iter_batched(
                || sorted.clone(),
                |mut obj| {
                    for k in doomed {
                        obj.erase(k.as_str());
                    }
                    obj
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("order_preserving", size), doomed, |b, doomed| {
            b.iter_batched(
                || preserved.clone(),
                |mut obj| {
                    for k in doomed {
                        obj.erase(k.as_str());
                    }
                    obj
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_insert, bench_get, bench_erase);
criterion_main!(benches);
