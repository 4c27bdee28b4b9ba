//! Baseline smart-building pipeline: random forests for energy and
//! comfort, evaluated with RMSE, reported as line charts.

use std::path::Path;

use buildsense::plot::{prediction_lines_report, SeriesPair};
use buildsense::{
    apply_split, root_mean_squared_error, simulate, split_indices, RandomForestRegressor,
    Regressor, Scenario,
};

const DATA_SEED: u64 = 42;
const SPLIT_SEED: u64 = 0;
const TEST_SIZE: f64 = 0.2;
const N_ESTIMATORS: usize = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Simulate IoT readings (energy + comfort)
    let frame = simulate(Scenario::Baseline, DATA_SEED);

    // 2. One row partition, reused for both targets
    let indices = split_indices(frame.n_samples(), TEST_SIZE, SPLIT_SEED)?;
    let energy = apply_split(&frame.features, &frame.energy, &indices);
    let comfort = apply_split(&frame.features, &frame.comfort, &indices);

    // 3. Train one forest per target
    let params = RandomForestRegressor::params().n_estimators(N_ESTIMATORS);
    let model_energy = params.seed(1).fit(&energy.x_train, &energy.y_train)?;
    let model_comfort = params.seed(2).fit(&comfort.x_train, &comfort.y_train)?;

    // 4. Predict on the holdout
    let pred_energy = model_energy.predict(&energy.x_test);
    let pred_comfort = model_comfort.predict(&comfort.x_test);

    // 5. Evaluate
    let rmse_energy = root_mean_squared_error(&energy.y_test, &pred_energy);
    let rmse_comfort = root_mean_squared_error(&comfort.y_test, &pred_comfort);

    println!("Energy Prediction RMSE: {:.2}", rmse_energy);
    println!("Comfort Prediction RMSE: {:.2}", rmse_comfort);

    // 6. Visualize
    let out = Path::new("plots/forest_sim.png");
    prediction_lines_report(
        out,
        &[
            SeriesPair {
                title: "Energy Consumption Prediction",
                y_label: "Energy (kWh)",
                actual_label: "Actual Energy",
                predicted_label: "Predicted Energy",
                actual: &energy.y_test,
                predicted: &pred_energy,
            },
            SeriesPair {
                title: "Comfort Index Prediction",
                y_label: "Comfort Index",
                actual_label: "Actual Comfort Index",
                predicted_label: "Predicted Comfort Index",
                actual: &comfort.y_test,
                predicted: &pred_comfort,
            },
        ],
    )?;
    println!("Wrote {}", out.display());

    Ok(())
}
