//! CART-style regression tree grown by variance reduction.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::learners::Regressor;

/// Hyperparameters for [`DecisionTreeRegressor`], builder style.
#[derive(Debug, Clone, Copy)]
pub struct DecisionTreeParams {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: Option<usize>,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        DecisionTreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

impl DecisionTreeParams {
    /// Maximum tree depth; `None` grows until leaves are pure or too small.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Minimum number of rows a node needs before a split is attempted.
    pub fn min_samples_split(mut self, min: usize) -> Self {
        self.min_samples_split = min.max(2);
        self
    }

    /// Minimum number of rows each child of a split must keep.
    pub fn min_samples_leaf(mut self, min: usize) -> Self {
        self.min_samples_leaf = min.max(1);
        self
    }

    /// Number of features considered per split; `None` considers all.
    /// Random forests pass a subsample size here.
    pub fn max_features(mut self, n: Option<usize>) -> Self {
        self.max_features = n;
        self
    }

    /// Fit a tree using all features deterministically.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<DecisionTreeRegressor> {
        // Feature subsampling, if requested, still needs an RNG; a fixed
        // seed keeps the plain fit reproducible.
        self.fit_with_rng(x, y, &mut StdRng::seed_from_u64(0))
    }

    /// Fit a tree with a caller-supplied RNG for feature subsampling.
    pub fn fit_with_rng<R: Rng>(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        rng: &mut R,
    ) -> Result<DecisionTreeRegressor> {
        if x.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                rows: x.nrows(),
                targets: y.len(),
            });
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidParameter("max_features must be at least 1"));
        }

        let rows: Vec<usize> = (0..x.nrows()).collect();
        let root = grow(x, y, &rows, 0, self, rng);
        Ok(DecisionTreeRegressor {
            root,
            n_features: x.ncols(),
        })
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted regression tree. Leaves predict the mean target of their rows.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    root: Node,
    n_features: usize,
}

impl DecisionTreeRegressor {
    pub fn params() -> DecisionTreeParams {
        DecisionTreeParams::default()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Depth of the fitted tree; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        depth_of(&self.root)
    }

    fn predict_row(&self, x: &Array2<f64>, row: usize) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[[row, *feature]] < *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl Regressor for DecisionTreeRegressor {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        (0..x.nrows()).map(|i| self.predict_row(x, i)).collect()
    }
}

fn grow<R: Rng>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    rows: &[usize],
    depth: usize,
    params: &DecisionTreeParams,
    rng: &mut R,
) -> Node {
    let mean = rows.iter().map(|&i| y[i]).sum::<f64>() / rows.len() as f64;

    let depth_reached = params.max_depth.map_or(false, |d| depth >= d);
    if depth_reached || rows.len() < params.min_samples_split {
        return Node::Leaf { value: mean };
    }
    // a pure node cannot gain from any split
    if rows.iter().all(|&i| (y[i] - mean).abs() < 1e-12) {
        return Node::Leaf { value: mean };
    }

    let candidates = candidate_features(x.ncols(), params.max_features, rng);
    let mut best: Option<(usize, f64, f64)> = None;
    for &feature in &candidates {
        if let Some((threshold, sse)) =
            best_split_on_feature(x, y, rows, feature, params.min_samples_leaf)
        {
            if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                best = Some((feature, threshold, sse));
            }
        }
    }

    let (feature, threshold, _) = match best {
        Some(b) => b,
        None => return Node::Leaf { value: mean },
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&i| x[[i, feature]] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(x, y, &left_rows, depth + 1, params, rng)),
        right: Box::new(grow(x, y, &right_rows, depth + 1, params, rng)),
    }
}

fn candidate_features<R: Rng>(n_features: usize, max_features: Option<usize>, rng: &mut R) -> Vec<usize> {
    match max_features {
        Some(k) if k < n_features => rand::seq::index::sample(rng, n_features, k).into_vec(),
        _ => (0..n_features).collect(),
    }
}

/// Best threshold on one feature, by total within-child squared error.
///
/// Scans the rows sorted by feature value with running sums, so each
/// candidate threshold (midpoint between adjacent distinct values) is
/// scored in O(1).
fn best_split_on_feature(
    x: &Array2<f64>,
    y: &Array1<f64>,
    rows: &[usize],
    feature: usize,
    min_samples_leaf: usize,
) -> Option<(f64, f64)> {
    let mut ordered: Vec<(f64, f64)> = rows.iter().map(|&i| (x[[i, feature]], y[i])).collect();
    ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let n = ordered.len();
    let total_sum: f64 = ordered.iter().map(|&(_, yv)| yv).sum();
    let total_sq: f64 = ordered.iter().map(|&(_, yv)| yv * yv).sum();

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for i in 0..n - 1 {
        left_sum += ordered[i].1;
        left_sq += ordered[i].1 * ordered[i].1;

        let n_left = i + 1;
        let n_right = n - n_left;
        if n_left < min_samples_leaf || n_right < min_samples_leaf {
            continue;
        }
        // no threshold separates equal values
        if ordered[i].0 == ordered[i + 1].0 {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / n_left as f64)
            + (right_sq - right_sum * right_sum / n_right as f64);

        if best.map_or(true, |(_, best_sse)| sse < best_sse) {
            let threshold = (ordered[i].0 + ordered[i + 1].0) / 2.0;
            best = Some((threshold, sse));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn single_split_recovers_step_function() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![0.0, 0.0, 0.0, 5.0, 5.0, 5.0];

        let tree = DecisionTreeRegressor::params().fit(&x, &y).unwrap();
        let pred = tree.predict(&x);
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-12);
        }
    }

    #[test]
    fn max_depth_zero_predicts_the_mean() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let tree = DecisionTreeRegressor::params()
            .max_depth(Some(0))
            .fit(&x, &y)
            .unwrap();
        assert_eq!(tree.depth(), 0);
        let pred = tree.predict(&x);
        for p in pred.iter() {
            assert!((p - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(DecisionTreeRegressor::params().fit(&x, &y).is_err());
    }
}
