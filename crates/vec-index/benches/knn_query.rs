//! Benchmarks for flat index queries
//!
//! Run with: cargo bench --package vec-index
//!
//! Measures an exhaustive k-NN scan at catalog-like sizes (10k vectors,
//! 384 dimensions).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vec_index::FlatIndex;

const DIMENSION: usize = 384;
const COUNT: usize = 10_000;

/// Deterministic pseudo-random fill, no RNG dependency needed
fn synthetic_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut state: u32 = 0x9E37_79B9;
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
                })
                .collect()
        })
        .collect()
}

fn bench_search_top_10(c: &mut Criterion) {
    let rows = synthetic_vectors(COUNT, DIMENSION);
    let index = FlatIndex::build(DIMENSION, rows.iter().map(|r| r.as_slice())).unwrap();
    let query = &rows[COUNT / 2];

    c.bench_function("flat_index_search_top_10", |b| {
        b.iter(|| {
            let hits = index.search(black_box(query), black_box(10)).unwrap();
            black_box(hits)
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let rows = synthetic_vectors(COUNT, DIMENSION);

    c.bench_function("flat_index_build", |b| {
        b.iter(|| {
            let index =
                FlatIndex::build(DIMENSION, rows.iter().map(|r| r.as_slice())).unwrap();
            black_box(index)
        })
    });
}

criterion_group!(benches, bench_search_top_10, bench_build);
criterion_main!(benches);
