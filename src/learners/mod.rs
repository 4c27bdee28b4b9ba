//! Base learners and the shared prediction seam.

mod tree;

pub use tree::{DecisionTreeParams, DecisionTreeRegressor};

use ndarray::{Array1, Array2};

/// A fitted regression model that maps a feature matrix to one prediction
/// per row.
pub trait Regressor: Send + Sync {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64>;
}
