//! Synthetic smart-building sensor simulation and energy/comfort
//! regression.
//!
//! The crate covers the full pipeline: scenario-driven data generation
//! ([`simulate`]), seeded train/holdout splitting ([`dataset`]), tree
//! ensemble regressors ([`forest`], [`boosting`]), accuracy metrics and
//! permutation importance ([`evaluation`]), and chart rendering ([`plot`]).
//! The `forest_sim` and `boost_sim` binaries run the two end-to-end
//! scenarios.

pub mod boosting;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod forest;
pub mod learners;
pub mod plot;
pub mod simulate;

pub use boosting::{HistGradientBoostingParams, HistGradientBoostingRegressor};
pub use dataset::{apply_split, split_indices, train_test_split, SplitIndices, TrainTestSplit};
pub use error::{Error, Result};
pub use evaluation::{
    mean_absolute_error, mean_squared_error, permutation_importance, r2_score,
    root_mean_squared_error, PermutationImportance,
};
pub use forest::{MaxFeatures, RandomForestParams, RandomForestRegressor};
pub use learners::{DecisionTreeParams, DecisionTreeRegressor, Regressor};
pub use simulate::{
    baseline_comfort, simulate, smart_building_comfort, Scenario, SensorFrame,
};
