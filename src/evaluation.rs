//! Regression accuracy metrics and permutation feature importance.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::learners::Regressor;

pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_true - y_pred).mapv(|e| e * e).mean().unwrap_or(0.0)
}

pub fn root_mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    mean_squared_error(y_true, y_pred).sqrt()
}

pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_true - y_pred).mapv(f64::abs).mean().unwrap_or(0.0)
}

/// Proportion of target variance explained by the predictions.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_res = (y_true - y_pred).mapv(|e| e * e).sum();
    let ss_tot = y_true.mapv(|v| (v - mean) * (v - mean)).sum();
    1.0 - ss_res / (ss_tot + 1e-10)
}

/// Per-feature permutation importances.
///
/// Importance of a feature is the mean RMSE degradation over `n_repeats`
/// shuffles of that feature's column, relative to the unpermuted score.
#[derive(Debug, Clone)]
pub struct PermutationImportance {
    /// Model RMSE on the unpermuted data.
    pub baseline_score: f64,
    pub importances_mean: Array1<f64>,
    pub importances_std: Array1<f64>,
}

impl PermutationImportance {
    /// Feature names paired with mean importances, strongest first.
    pub fn ranking<S: AsRef<str>>(&self, names: &[S]) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = names
            .iter()
            .zip(self.importances_mean.iter())
            .map(|(name, &imp)| (name.as_ref().to_string(), imp))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        ranked
    }
}

/// Estimate feature importances by shuffling one column at a time.
///
/// Each of the `n_repeats` shuffles uses the seeded RNG, so results are
/// reproducible for a fixed `(model, x, y, seed)`.
pub fn permutation_importance<M: Regressor + ?Sized>(
    model: &M,
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_repeats: usize,
    seed: u64,
) -> PermutationImportance {
    let baseline_score = root_mean_squared_error(y, &model.predict(x));
    let mut rng = StdRng::seed_from_u64(seed);

    let n_features = x.ncols();
    let mut means = Array1::zeros(n_features);
    let mut stds = Array1::zeros(n_features);

    for feature in 0..n_features {
        let mut degradations = Vec::with_capacity(n_repeats);
        for _ in 0..n_repeats {
            let mut permuted = x.clone();
            let mut column: Vec<f64> = permuted.column(feature).to_vec();
            column.shuffle(&mut rng);
            permuted
                .column_mut(feature)
                .assign(&Array1::from(column));

            let score = root_mean_squared_error(y, &model.predict(&permuted));
            degradations.push(score - baseline_score);
        }

        let degradations = Array1::from(degradations);
        means[feature] = degradations.mean().unwrap_or(0.0);
        stds[feature] = degradations.std(0.0);
    }

    PermutationImportance {
        baseline_score,
        importances_mean: means,
        importances_std: stds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rmse_of_identical_series_is_zero() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(root_mean_squared_error(&y, &y.clone()), 0.0);
    }

    #[test]
    fn mae_matches_hand_computed_value() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.5, 2.0, 2.0, 5.0];
        // errors: 0.5, 0.0, 1.0, 1.0 -> mean 0.625
        assert!((mean_absolute_error(&y_true, &y_pred) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn rmse_dominates_mae() {
        let y_true = array![0.0, 0.0, 0.0, 0.0];
        let y_pred = array![0.0, 0.0, 0.0, 4.0];
        assert!(root_mean_squared_error(&y_true, &y_pred) >= mean_absolute_error(&y_true, &y_pred));
    }
}
