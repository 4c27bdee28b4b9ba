//! Benchmarks for the tree-ensemble fitting paths.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use buildsense::{
    simulate, DecisionTreeRegressor, HistGradientBoostingRegressor, RandomForestRegressor,
    Regressor, Scenario,
};

fn generate_regression_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(0);
    let x = Array2::random_using((n_samples, n_features), Uniform::new(0.0, 1.0), &mut rng);

    let mut y = Array1::zeros(n_samples);
    for i in 0..n_samples {
        let x0: f64 = x[[i, 0]];
        let x1: f64 = x[[i, 1 % n_features]];
        let x2: f64 = x[[i, 2 % n_features]];
        y[i] = 2.0 * x0 + 3.0 * x1.powi(2) - 1.5 * x2 + 0.5;
    }
    (x, y)
}

fn bench_tree_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_fit");
    for &n in &[100usize, 400, 1000] {
        let (x, y) = generate_regression_data(n, 10);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                DecisionTreeRegressor::params()
                    .max_depth(Some(8))
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);
    let (x, y) = generate_regression_data(400, 10);
    for &n_estimators in &[10usize, 50, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_estimators),
            &n_estimators,
            |b, &n_estimators| {
                b.iter(|| {
                    RandomForestRegressor::params()
                        .n_estimators(n_estimators)
                        .seed(0)
                        .fit(black_box(&x), black_box(&y))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_boosting_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("boosting_fit");
    group.sample_size(10);
    let (x, y) = generate_regression_data(400, 10);
    for &max_iter in &[50usize, 200] {
        group.bench_with_input(
            BenchmarkId::from_parameter(max_iter),
            &max_iter,
            |b, &max_iter| {
                b.iter(|| {
                    HistGradientBoostingRegressor::params()
                        .max_iter(max_iter)
                        .fit(black_box(&x), black_box(&y))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_scenario_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario_predict");
    group.sample_size(10);

    let frame = simulate(Scenario::SmartBuilding, 2024);
    let model = HistGradientBoostingRegressor::params()
        .max_iter(50)
        .fit(&frame.features, &frame.energy)
        .unwrap();

    group.bench_function("smart_building_400", |b| {
        b.iter(|| model.predict(black_box(&frame.features)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_tree_fit,
    bench_forest_fit,
    bench_boosting_fit,
    bench_scenario_pipeline
);
criterion_main!(benches);
