//! Train/holdout partitioning of feature matrices and targets.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Row indices of a shuffled train/holdout partition.
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and partition it by `test_size`.
///
/// The holdout gets `round(n * test_size)` rows, clamped so that both
/// partitions keep at least one row when `n >= 2`. Exposed separately from
/// [`train_test_split`] so one partition can be reused for several targets
/// over the same feature matrix.
pub fn split_indices(n: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if n == 0 {
        return Err(Error::EmptyDataset);
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidTestSize(test_size));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n as f64 * test_size).round() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    }

    let train = indices.split_off(n_test);
    Ok(SplitIndices { train, test: indices })
}

/// A materialized train/holdout split of one (x, y) pair.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Split features and one target into shuffled train/holdout sets.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if x.nrows() != y.len() {
        return Err(Error::ShapeMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    let indices = split_indices(x.nrows(), test_size, seed)?;
    Ok(apply_split(x, y, &indices))
}

/// Select the rows of an existing partition out of `x` and `y`.
pub fn apply_split(x: &Array2<f64>, y: &Array1<f64>, indices: &SplitIndices) -> TrainTestSplit {
    TrainTestSplit {
        x_train: x.select(Axis(0), &indices.train),
        x_test: x.select(Axis(0), &indices.test),
        y_train: y.select(Axis(0), &indices.train),
        y_test: y.select(Axis(0), &indices.test),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_is_disjoint_and_complete() {
        let split = split_indices(10, 0.2, 7).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_partition() {
        let a = split_indices(50, 0.25, 42).unwrap();
        let b = split_indices(50, 0.25, 42).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn rejects_degenerate_test_size() {
        assert!(split_indices(10, 0.0, 0).is_err());
        assert!(split_indices(10, 1.0, 0).is_err());
        assert!(split_indices(0, 0.5, 0).is_err());
    }
}
