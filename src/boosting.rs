//! Histogram gradient boosting for regression with squared loss.
//!
//! Features are quantile-binned once up front; every boosting round fits a
//! depth-limited tree to the current residuals, searching splits over
//! per-bin histograms (row count and residual sum per bin). With squared
//! loss the negative gradient is the residual, so the model is
//! `baseline + learning_rate * sum(trees)`.

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::learners::Regressor;

/// Maps raw feature values onto quantile bins.
///
/// `edges[f]` holds the ascending interior cut points of feature `f`; a
/// value lands in bin `partition_point(edges, edge <= value)`, so splits on
/// "bin <= b" are equivalent to "value < edges[b]" on raw data.
#[derive(Debug, Clone)]
pub struct BinMapper {
    edges: Vec<Vec<f64>>,
}

impl BinMapper {
    /// Compute per-feature cut points, at most `max_bins` bins per feature.
    pub fn fit(x: &Array2<f64>, max_bins: usize) -> BinMapper {
        let edges = (0..x.ncols())
            .map(|f| {
                let mut values: Vec<f64> = x.column(f).to_vec();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap());
                values.dedup();
                feature_edges(&values, max_bins)
            })
            .collect();
        BinMapper { edges }
    }

    pub fn n_bins(&self, feature: usize) -> usize {
        self.edges[feature].len() + 1
    }

    /// Raw cut-point value of edge `b` for `feature`.
    fn edge(&self, feature: usize, b: usize) -> f64 {
        self.edges[feature][b]
    }

    fn bin(&self, feature: usize, value: f64) -> usize {
        self.edges[feature].partition_point(|&e| e <= value)
    }

    /// Bin every entry of `x`.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<u16> {
        Array2::from_shape_fn((x.nrows(), x.ncols()), |(i, j)| {
            self.bin(j, x[[i, j]]) as u16
        })
    }
}

/// Interior cut points for one feature given its sorted distinct values.
fn feature_edges(distinct: &[f64], max_bins: usize) -> Vec<f64> {
    let n = distinct.len();
    if n <= 1 {
        return Vec::new();
    }
    if n <= max_bins {
        // one bin per distinct value, cut at midpoints
        return distinct
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect();
    }
    let mut edges = Vec::with_capacity(max_bins - 1);
    for b in 1..max_bins {
        let idx = b * n / max_bins;
        let edge = (distinct[idx - 1] + distinct[idx]) / 2.0;
        if edges.last().map_or(true, |&last: &f64| edge > last) {
            edges.push(edge);
        }
    }
    edges
}

/// Hyperparameters for [`HistGradientBoostingRegressor`], builder style.
#[derive(Debug, Clone, Copy)]
pub struct HistGradientBoostingParams {
    max_iter: usize,
    learning_rate: f64,
    max_depth: Option<usize>,
    max_bins: usize,
    min_samples_leaf: usize,
}

impl Default for HistGradientBoostingParams {
    fn default() -> Self {
        HistGradientBoostingParams {
            max_iter: 200,
            learning_rate: 0.1,
            max_depth: Some(6),
            max_bins: 255,
            min_samples_leaf: 20,
        }
    }
}

impl HistGradientBoostingParams {
    /// Number of boosting rounds.
    pub fn max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    /// Shrinkage applied to every tree's contribution.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_bins(mut self, bins: usize) -> Self {
        self.max_bins = bins;
        self
    }

    pub fn min_samples_leaf(mut self, min: usize) -> Self {
        self.min_samples_leaf = min.max(1);
        self
    }

    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<HistGradientBoostingRegressor> {
        if x.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                rows: x.nrows(),
                targets: y.len(),
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter("max_iter must be at least 1"));
        }
        if !(self.learning_rate > 0.0) {
            return Err(Error::InvalidParameter("learning_rate must be positive"));
        }
        if self.max_bins < 2 || self.max_bins > 256 {
            return Err(Error::InvalidParameter("max_bins must lie in 2..=256"));
        }

        let mapper = BinMapper::fit(x, self.max_bins);
        let binned = mapper.transform(x);

        let baseline = y.mean().unwrap_or(0.0);
        let mut current = Array1::from_elem(y.len(), baseline);
        let mut trees = Vec::with_capacity(self.max_iter);
        let rows: Vec<usize> = (0..x.nrows()).collect();

        for _ in 0..self.max_iter {
            let residual = y - &current;
            let root = grow(&binned, &mapper, &residual, &rows, 0, self);
            let tree = HistTree { root };
            current += &(self.learning_rate * &tree.predict_raw(x));
            trees.push(tree);
        }

        Ok(HistGradientBoostingRegressor {
            baseline,
            learning_rate: self.learning_rate,
            trees,
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
        /// Raw cut-point value; rows with `value < threshold` go left.
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone)]
struct HistTree {
    root: Node,
}

impl HistTree {
    fn predict_raw(&self, x: &Array2<f64>) -> Array1<f64> {
        (0..x.nrows())
            .map(|i| {
                let mut node = &self.root;
                loop {
                    match node {
                        Node::Leaf { value } => return *value,
                        Node::Split {
                            feature,
                            threshold,
                            left,
                            right,
                            ..
                        } => {
                            node = if x[[i, *feature]] < *threshold {
                                left
                            } else {
                                right
                            };
                        }
                    }
                }
            })
            .collect()
    }
}

fn grow(
    binned: &Array2<u16>,
    mapper: &BinMapper,
    grad: &Array1<f64>,
    rows: &[usize],
    depth: usize,
    params: &HistGradientBoostingParams,
) -> Node {
    let total: f64 = rows.iter().map(|&i| grad[i]).sum();
    let mean = total / rows.len() as f64;

    let depth_reached = params.max_depth.map_or(false, |d| depth >= d);
    if depth_reached || rows.len() < 2 * params.min_samples_leaf {
        return Node::Leaf { value: mean };
    }

    let best = (0..binned.ncols())
        .filter_map(|feature| {
            best_histogram_split(binned, grad, rows, feature, mapper.n_bins(feature), params)
                .map(|(bin, gain)| (feature, bin, gain))
        })
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap());

    let (feature, bin, _) = match best {
        Some(b) => b,
        None => return Node::Leaf { value: mean },
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&i| binned[[i, feature]] <= bin);

    Node::Split {
        feature,
        threshold: mapper.edge(feature, bin as usize),
        left: Box::new(grow(binned, mapper, grad, &left_rows, depth + 1, params)),
        right: Box::new(grow(binned, mapper, grad, &right_rows, depth + 1, params)),
    }
}

/// Best bin cut for one feature, by squared-error gain
/// `GL^2/nL + GR^2/nR - G^2/n` over the per-bin histogram.
fn best_histogram_split(
    binned: &Array2<u16>,
    grad: &Array1<f64>,
    rows: &[usize],
    feature: usize,
    n_bins: usize,
    params: &HistGradientBoostingParams,
) -> Option<(u16, f64)> {
    if n_bins < 2 {
        return None;
    }

    let mut counts = vec![0usize; n_bins];
    let mut sums = vec![0.0f64; n_bins];
    for &i in rows {
        let b = binned[[i, feature]] as usize;
        counts[b] += 1;
        sums[b] += grad[i];
    }

    let n_total = rows.len();
    let g_total: f64 = sums.iter().sum();
    let parent_score = g_total * g_total / n_total as f64;

    let mut n_left = 0usize;
    let mut g_left = 0.0f64;
    let mut best: Option<(u16, f64)> = None;

    // cutting after bin b sends bins 0..=b left
    for b in 0..n_bins - 1 {
        n_left += counts[b];
        g_left += sums[b];

        let n_right = n_total - n_left;
        if n_left < params.min_samples_leaf || n_right < params.min_samples_leaf {
            continue;
        }

        let g_right = g_total - g_left;
        let gain = g_left * g_left / n_left as f64 + g_right * g_right / n_right as f64
            - parent_score;

        if gain > 1e-12 && best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((b as u16, gain));
        }
    }

    best
}

/// A fitted histogram-gradient-boosting model.
#[derive(Debug, Clone)]
pub struct HistGradientBoostingRegressor {
    baseline: f64,
    learning_rate: f64,
    trees: Vec<HistTree>,
}

impl HistGradientBoostingRegressor {
    pub fn params() -> HistGradientBoostingParams {
        HistGradientBoostingParams::default()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean of the training target, the round-zero prediction.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }
}

impl Regressor for HistGradientBoostingRegressor {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let mut pred = Array1::from_elem(x.nrows(), self.baseline);
        for tree in &self.trees {
            pred += &(self.learning_rate * &tree.predict_raw(x));
        }
        pred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn bins_respect_edge_semantics() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let mapper = BinMapper::fit(&x, 256);
        // 4 distinct values -> 3 midpoint edges -> 4 bins
        assert_eq!(mapper.n_bins(0), 4);
        assert_eq!(mapper.bin(0, 0.5), 0);
        assert_eq!(mapper.bin(0, 2.1), 1);
        assert_eq!(mapper.bin(0, 9.0), 3);
    }

    #[test]
    fn boosting_drives_training_error_down() {
        let n = 80;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = x.column(0).mapv(|v| if v < 40.0 { 10.0 } else { 30.0 });

        let model = HistGradientBoostingRegressor::params()
            .max_iter(50)
            .min_samples_leaf(5)
            .fit(&x, &y)
            .unwrap();

        let pred = model.predict(&x);
        let mse = (&pred - &y).mapv(|e| e * e).mean().unwrap();
        let var = {
            let m = y.mean().unwrap();
            y.mapv(|v| (v - m) * (v - m)).mean().unwrap()
        };
        assert!(mse < var / 10.0);
    }

    #[test]
    fn constant_target_predicts_the_baseline() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![7.0, 7.0, 7.0, 7.0, 7.0];
        let model = HistGradientBoostingRegressor::params()
            .max_iter(5)
            .min_samples_leaf(1)
            .fit(&x, &y)
            .unwrap();
        for p in model.predict(&x).iter() {
            assert!((p - 7.0).abs() < 1e-9);
        }
    }
}
