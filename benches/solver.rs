//! Benchmarks for the set-cover strategies.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use setcover::{Calculator, ColorMode};

/// Builds a deterministic binary problem where each picture covers roughly a
/// quarter of the image.
fn binary_problem(pictures: usize, elements: usize) -> Calculator {
    let mut calculator = Calculator::new(pictures, elements, ColorMode::Binary);
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    for _ in 0..pictures {
        let picture: Vec<u32> = (0..elements)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                u32::from(state % 4 == 0)
            })
            .collect();
        calculator
            .add_picture(&picture)
            .expect("generated picture is binary");
    }
    calculator
}

/// Benchmark the greedy heuristic on a medium instance.
fn bench_greedy(c: &mut Criterion) {
    c.bench_function("greedy_64x1024", |b| {
        b.iter(|| black_box(binary_problem(64, 1024)).greedy())
    });
}

/// Benchmark the exact branch-and-bound search.
fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);
    group.bench_function("exact_24x256", |b| {
        b.iter(|| black_box(binary_problem(24, 256)).exact(None))
    });
    group.finish();
}

/// Benchmark the exhaustive search with a cover limit.
fn bench_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("exhaustive");
    group.sample_size(10);
    group.bench_function("exhaustive_16x128_90pct", |b| {
        b.iter(|| black_box(binary_problem(16, 128)).exhaustive(Some(0.9), None))
    });
    group.finish();
}

/// Benchmark the weighted coverage path.
fn bench_weighted(c: &mut Criterion) {
    let elements = 256;
    c.bench_function("weighted_exact_12x256", |b| {
        b.iter(|| {
            let mut calculator = Calculator::new(12, elements, ColorMode::weighted());
            for p in 0..12u32 {
                let picture: Vec<u32> = (0..elements as u32)
                    .map(|e| (e * 31 + p * 17) % 256)
                    .collect();
                calculator
                    .add_picture(&picture)
                    .expect("generated picture is in range");
            }
            black_box(calculator.exact(None))
        })
    });
}

criterion_group!(
    benches,
    bench_greedy,
    bench_exact,
    bench_exhaustive,
    bench_weighted
);
criterion_main!(benches);
