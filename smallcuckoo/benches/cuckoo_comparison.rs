use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use rustc_hash::FxHashMap;
use smallcuckoo::SmallCuckoo;
use std::collections::HashMap;

/// Random distinct-enough keys; collisions among 64-bit draws are negligible.
fn generate_keys(size: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.r#gen::<u64>()).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &size in &[1_000usize, 10_000, 60_000] {
        let keys = generate_keys(size);

        group.bench_with_input(BenchmarkId::new("SmallCuckoo", size), &keys, |b, keys| {
            b.iter(|| {
                let mut table = SmallCuckoo::new(0);
                for &k in keys {
                    table.insert(k, k);
                }
                black_box(table.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("SmallCuckoo presized", size), &keys, |b, keys| {
            b.iter(|| {
                let mut table = SmallCuckoo::new(keys.len());
                for &k in keys {
                    table.insert(k, k);
                }
                black_box(table.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("std::HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = HashMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("FxHashMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = FxHashMap::default();
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map.len())
            })
        });
    }
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    for &size in &[1_000usize, 10_000, 60_000] {
        let keys = generate_keys(size);

        let mut table = SmallCuckoo::new(0);
        let mut std_map = HashMap::new();
        let mut fx_map = FxHashMap::default();
        for &k in &keys {
            table.insert(k, k);
            std_map.insert(k, k);
            fx_map.insert(k, k);
        }

        group.bench_with_input(BenchmarkId::new("SmallCuckoo", size), &keys, |b, keys| {
            b.iter(|| {
                for &k in keys {
                    black_box(table.find(k));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("std::HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(std_map.get(k));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("FxHashMap", size), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(fx_map.get(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let keys = generate_keys(60_000);
    let mut table = SmallCuckoo::new(0);
    for &k in &keys {
        table.insert(k, k);
    }
    let image = table.to_bytes();

    c.bench_function("deserialize 60k", |b| {
        b.iter(|| black_box(SmallCuckoo::from_bytes(&image).map(|t| t.len()).ok()))
    });
}

criterion_group!(benches, bench_insert, bench_find, bench_reload);
criterion_main!(benches);
