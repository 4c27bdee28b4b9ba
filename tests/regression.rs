//! End-to-end pipeline tests: simulate, split, fit, predict, evaluate.

use buildsense::{
    apply_split, mean_absolute_error, root_mean_squared_error, simulate, split_indices,
    train_test_split, HistGradientBoostingRegressor, RandomForestRegressor, Regressor, Scenario,
};
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Synthetic data with a learnable signal and a little noise.
fn learnable_data(n_samples: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array2::random_using((n_samples, 4), Uniform::new(0.0, 1.0), &mut rng);
    let noise = Array1::random_using(n_samples, Uniform::new(-0.05, 0.05), &mut rng);

    let mut y = Array1::zeros(n_samples);
    for i in 0..n_samples {
        y[i] = 3.0 * x[[i, 0]] - 2.0 * x[[i, 1]] + x[[i, 2]] * x[[i, 3]] + noise[i];
    }
    (x, y)
}

fn variance(y: &Array1<f64>) -> f64 {
    let mean = y.mean().unwrap();
    y.mapv(|v| (v - mean) * (v - mean)).mean().unwrap()
}

#[test]
fn forest_pipeline_shapes_and_metric_sign() {
    let frame = simulate(Scenario::Baseline, 42);
    let indices = split_indices(frame.n_samples(), 0.2, 0).unwrap();
    let energy = apply_split(&frame.features, &frame.energy, &indices);

    let model = RandomForestRegressor::params()
        .n_estimators(30)
        .seed(0)
        .fit(&energy.x_train, &energy.y_train)
        .unwrap();
    let pred = model.predict(&energy.x_test);

    assert_eq!(pred.len(), energy.y_test.len());
    assert_eq!(pred.len(), indices.test.len());
    assert!(root_mean_squared_error(&energy.y_test, &pred) >= 0.0);
}

#[test]
fn boosting_pipeline_shapes_and_metric_sign() {
    let frame = simulate(Scenario::SmartBuilding, 2024);
    let indices = split_indices(frame.n_samples(), 0.25, 2024).unwrap();
    let comfort = apply_split(&frame.features, &frame.comfort, &indices);

    let model = HistGradientBoostingRegressor::params()
        .max_iter(50)
        .fit(&comfort.x_train, &comfort.y_train)
        .unwrap();
    let pred = model.predict(&comfort.x_test);

    assert_eq!(pred.len(), comfort.y_test.len());
    assert_eq!(indices.test.len(), 100);
    assert!(mean_absolute_error(&comfort.y_test, &pred) >= 0.0);
}

#[test]
fn pipelines_are_deterministic_end_to_end() {
    let run = || {
        let frame = simulate(Scenario::Baseline, 42);
        let split = train_test_split(&frame.features, &frame.comfort, 0.2, 0).unwrap();
        let model = RandomForestRegressor::params()
            .n_estimators(20)
            .seed(5)
            .fit(&split.x_train, &split.y_train)
            .unwrap();
        let pred = model.predict(&split.x_test);
        root_mean_squared_error(&split.y_test, &pred)
    };
    assert_eq!(run(), run());
}

#[test]
fn forest_beats_the_mean_baseline_on_learnable_data() {
    let (x, y) = learnable_data(300, 11);
    let split = train_test_split(&x, &y, 0.25, 1).unwrap();

    let model = RandomForestRegressor::params()
        .n_estimators(50)
        .seed(3)
        .fit(&split.x_train, &split.y_train)
        .unwrap();
    let pred = model.predict(&split.x_test);

    let model_mse = (&pred - &split.y_test).mapv(|e| e * e).mean().unwrap();
    // predicting the training mean everywhere scores the target variance
    assert!(model_mse < variance(&split.y_test) * 0.5);
}

#[test]
fn boosting_beats_the_mean_baseline_on_learnable_data() {
    let (x, y) = learnable_data(300, 13);
    let split = train_test_split(&x, &y, 0.25, 1).unwrap();

    let model = HistGradientBoostingRegressor::params()
        .max_iter(100)
        .min_samples_leaf(5)
        .fit(&split.x_train, &split.y_train)
        .unwrap();
    let pred = model.predict(&split.x_test);

    let model_mse = (&pred - &split.y_test).mapv(|e| e * e).mean().unwrap();
    assert!(model_mse < variance(&split.y_test) * 0.5);
}

#[test]
fn comfort_model_learns_its_closed_form_target() {
    // comfort is a deterministic function of the features, so a holdout
    // fit should get much closer than the mean predictor
    let frame = simulate(Scenario::SmartBuilding, 2024);
    let split = train_test_split(&frame.features, &frame.comfort, 0.25, 2024).unwrap();

    let model = HistGradientBoostingRegressor::params()
        .max_iter(200)
        .fit(&split.x_train, &split.y_train)
        .unwrap();
    let pred = model.predict(&split.x_test);

    let model_mse = (&pred - &split.y_test).mapv(|e| e * e).mean().unwrap();
    assert!(model_mse < variance(&split.y_test));
}

#[test]
fn mismatched_shapes_are_rejected() {
    let x = Array2::<f64>::zeros((10, 3));
    let y = Array1::<f64>::zeros(9);

    assert!(RandomForestRegressor::params().fit(&x, &y).is_err());
    assert!(HistGradientBoostingRegressor::params().fit(&x, &y).is_err());
    assert!(train_test_split(&x, &y, 0.2, 0).is_err());
}
