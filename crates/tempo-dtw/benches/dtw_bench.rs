//! Criterion benchmarks for tempo-dtw: distance matrix, full alignment, and rolling cost.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use tempo_dtw::{DistanceMatrix, Dtw, Metric, TimeSeries, align};

/// Ten-dimensional series shaped like per-frame pose displacement features.
fn make_pose_series(n: usize, phase: f64) -> TimeSeries {
    let frames: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..10)
                .map(|d| ((i as f64 * 0.1) + phase + d as f64).sin() + 2.0)
                .collect()
        })
        .collect();
    TimeSeries::new(frames).unwrap()
}

fn bench_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");

    for &len in &[64usize, 256, 1024] {
        let a = make_pose_series(len, 0.0);
        let b = make_pose_series(len, 0.5);
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| DistanceMatrix::build(Metric::Cosine, a.as_view(), b.as_view()).unwrap());
        });
    }

    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    for &len in &[64usize, 256, 1024] {
        let a = make_pose_series(len, 0.0);
        let b = make_pose_series(len, 0.5);
        let distances = DistanceMatrix::build(Metric::Cosine, a.as_view(), b.as_view()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &distances, |bencher, d| {
            bencher.iter(|| align(d).unwrap());
        });
    }

    group.finish();
}

fn bench_rolling_cost(c: &mut Criterion) {
    let a = make_pose_series(256, 0.0);
    let b = make_pose_series(256, 0.5);
    let dtw = Dtw::cosine();

    c.bench_function("rolling_cost_256", |bencher| {
        bencher.iter(|| dtw.cost(a.as_view(), b.as_view()).unwrap());
    });
}

criterion_group!(benches, bench_distance_matrix, bench_align, bench_rolling_cost);
criterion_main!(benches);
