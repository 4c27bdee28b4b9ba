//! Smart-building pipeline with the extended sensor set: histogram
//! gradient boosting for energy and comfort, MAE evaluation, permutation
//! feature importance, and a 2x3 chart grid.

use std::path::Path;

use buildsense::plot::boosting_report;
use buildsense::{
    apply_split, mean_absolute_error, permutation_importance, simulate, split_indices,
    HistGradientBoostingRegressor, Regressor, Scenario,
};

const SEED: u64 = 2024;
const TEST_SIZE: f64 = 0.25;
const MAX_ITER: usize = 200;
const IMPORTANCE_REPEATS: usize = 15;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Simulate the extended smart-building sensor set
    let frame = simulate(Scenario::SmartBuilding, SEED);

    // 2. One row partition, reused for both targets
    let indices = split_indices(frame.n_samples(), TEST_SIZE, SEED)?;
    let energy = apply_split(&frame.features, &frame.energy, &indices);
    let comfort = apply_split(&frame.features, &frame.comfort, &indices);

    // 3. Train one boosting model per target
    let params = HistGradientBoostingRegressor::params().max_iter(MAX_ITER);
    let model_energy = params.fit(&energy.x_train, &energy.y_train)?;
    let model_comfort = params.fit(&comfort.x_train, &comfort.y_train)?;

    // 4. Predict on the holdout
    let pred_energy = model_energy.predict(&energy.x_test);
    let pred_comfort = model_comfort.predict(&comfort.x_test);

    // 5. Evaluate with MAE
    let mae_energy = mean_absolute_error(&energy.y_test, &pred_energy);
    let mae_comfort = mean_absolute_error(&comfort.y_test, &pred_comfort);

    println!("Energy Prediction MAE: {:.2}", mae_energy);
    println!("Comfort Prediction MAE: {:.2}", mae_comfort);

    // 6. Permutation importances on the holdout
    let imp_energy = permutation_importance(
        &model_energy,
        &energy.x_test,
        &energy.y_test,
        IMPORTANCE_REPEATS,
        SEED,
    );
    let imp_comfort = permutation_importance(
        &model_comfort,
        &comfort.x_test,
        &comfort.y_test,
        IMPORTANCE_REPEATS,
        SEED,
    );

    println!("\nEnergy Model Permutation Importances:");
    print_ranking(&imp_energy.ranking(&frame.feature_names));
    println!("\nComfort Model Permutation Importances:");
    print_ranking(&imp_comfort.ranking(&frame.feature_names));

    // 7. Visualize
    let smart_tech = [
        ("Smart Blinds", frame.column("smart_blinds_position").unwrap().to_owned()),
        ("Air Purifier", frame.column("air_purifier_status").unwrap().to_owned()),
        ("Solar Output", frame.column("solar_panel_output").unwrap().to_owned()),
    ];

    let out = Path::new("plots/boost_sim.png");
    boosting_report(
        out,
        &energy.y_test,
        &pred_energy,
        &comfort.y_test,
        &pred_comfort,
        &frame.feature_names,
        &imp_energy.importances_mean,
        &imp_comfort.importances_mean,
        &smart_tech,
    )?;
    println!("\nWrote {}", out.display());

    Ok(())
}

fn print_ranking(ranking: &[(String, f64)]) {
    for (name, importance) in ranking {
        println!("{:<24} {:>10.4}", name, importance);
    }
}
