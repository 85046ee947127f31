use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine::Store;
use tempfile::tempdir;

const N_KEYS: usize = 1_000;
const VALUE_SIZE: usize = 100;

fn fill(store: &mut Store, n: usize) {
    for i in 0..n {
        store
            .put(format!("key{}", i).into_bytes(), vec![b'x'; VALUE_SIZE])
            .unwrap();
    }
}

fn put_benchmark(c: &mut Criterion) {
    c.bench_function("store_put_1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let store = Store::open(dir.path()).unwrap();
                (dir, store)
            },
            |(_dir, mut store)| {
                fill(&mut store, N_KEYS);
            },
            BatchSize::SmallInput,
        );
    });
}

fn get_hit_benchmark(c: &mut Criterion) {
    c.bench_function("store_get_hit_1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let mut store = Store::open(dir.path()).unwrap();
                fill(&mut store, N_KEYS);
                (dir, store)
            },
            |(_dir, mut store)| {
                for i in 0..N_KEYS {
                    let key = format!("key{}", i).into_bytes();
                    let v = store.get(&key).unwrap();
                    assert_eq!(v.len(), VALUE_SIZE);
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn rotate_merge_benchmark(c: &mut Criterion) {
    c.bench_function("store_rotate_with_merge_3x1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let mut store = Store::open(dir.path()).unwrap();
                // Two sealed logs plus a populated active log: the next
                // rotation crosses the threshold and merges.
                fill(&mut store, N_KEYS);
                store.rotate().unwrap();
                fill(&mut store, N_KEYS);
                store.rotate().unwrap();
                fill(&mut store, N_KEYS);
                (dir, store)
            },
            |(_dir, mut store)| {
                store.rotate().unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    put_benchmark,
    get_hit_benchmark,
    rotate_merge_benchmark
);
criterion_main!(benches);
