//! Random forest regressor: bagged regression trees with per-split
//! feature subsampling.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::learners::{DecisionTreeParams, DecisionTreeRegressor, Regressor};

/// How many features each split draws from.
#[derive(Debug, Clone, Copy)]
pub enum MaxFeatures {
    /// Every split sees every feature.
    All,
    Sqrt,
    Log2,
    Exact(usize),
}

impl MaxFeatures {
    fn resolve(&self, n_features: usize) -> Option<usize> {
        let k = match self {
            MaxFeatures::All => return None,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().round() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::Exact(k) => *k,
        };
        Some(k.clamp(1, n_features))
    }
}

/// Hyperparameters for [`RandomForestRegressor`], builder style.
#[derive(Debug, Clone, Copy)]
pub struct RandomForestParams {
    n_estimators: usize,
    tree_params: DecisionTreeParams,
    max_features: MaxFeatures,
    bootstrap: bool,
    seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        RandomForestParams {
            n_estimators: 100,
            tree_params: DecisionTreeParams::default(),
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 0,
        }
    }
}

impl RandomForestParams {
    pub fn n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Hyperparameters applied to every tree in the ensemble.
    pub fn tree_params(mut self, params: DecisionTreeParams) -> Self {
        self.tree_params = params;
        self
    }

    pub fn max_features(mut self, policy: MaxFeatures) -> Self {
        self.max_features = policy;
        self
    }

    /// Whether each tree trains on a bootstrap resample of the rows.
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit the forest. Tree fits run in parallel; per-tree seeds are drawn
    /// up front from the forest seed, so the result does not depend on
    /// thread scheduling.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<RandomForestRegressor> {
        if x.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                rows: x.nrows(),
                targets: y.len(),
            });
        }
        if self.n_estimators == 0 {
            return Err(Error::InvalidParameter("n_estimators must be at least 1"));
        }

        let tree_params = self
            .tree_params
            .max_features(self.max_features.resolve(x.ncols()));

        let mut seed_rng = StdRng::seed_from_u64(self.seed);
        let tree_seeds: Vec<u64> = (0..self.n_estimators).map(|_| seed_rng.gen()).collect();

        let trees: Result<Vec<DecisionTreeRegressor>> = tree_seeds
            .into_par_iter()
            .map(|tree_seed| {
                let mut rng = StdRng::seed_from_u64(tree_seed);
                if self.bootstrap {
                    let (xb, yb) = bootstrap_sample(x, y, &mut rng);
                    tree_params.fit_with_rng(&xb, &yb, &mut rng)
                } else {
                    tree_params.fit_with_rng(x, y, &mut rng)
                }
            })
            .collect();

        Ok(RandomForestRegressor { trees: trees? })
    }
}

fn bootstrap_sample<R: Rng>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    rng: &mut R,
) -> (Array2<f64>, Array1<f64>) {
    let n = x.nrows();
    let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
    (
        x.select(ndarray::Axis(0), &rows),
        y.select(ndarray::Axis(0), &rows),
    )
}

/// A fitted forest; prediction is the per-row mean over all trees.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForestRegressor {
    pub fn params() -> RandomForestParams {
        RandomForestParams::default()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForestRegressor {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let mut sum = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            sum += &tree.predict(x);
        }
        sum / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn forest_is_deterministic_for_a_seed() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0], [5.0, 0.0], [6.0, 1.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let a = RandomForestRegressor::params()
            .n_estimators(10)
            .seed(7)
            .fit(&x, &y)
            .unwrap();
        let b = RandomForestRegressor::params()
            .n_estimators(10)
            .seed(7)
            .fit(&x, &y)
            .unwrap();

        assert_eq!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn zero_estimators_is_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        assert!(RandomForestRegressor::params()
            .n_estimators(0)
            .fit(&x, &y)
            .is_err());
    }
}
