//! # Ensemble Regression Forest
//!
//! A bagged ensemble of CART regression trees fitted by exhaustive
//! variance-reduction split search, implemented directly on `ndarray`
//! structures. Keeping the estimator in-crate makes fitting deterministic
//! for a fixed seed and lets the fitted trees serialize into the model
//! artifact as plain data.
//!
//! Trees grow independently on bootstrap resamples and are fitted in
//! parallel. Each tree derives its RNG stream from the forest seed plus its
//! own index, so the fitted ensemble never depends on thread scheduling.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForestError {
    #[error("Cannot fit a forest on an empty design matrix.")]
    EmptyTrainingSet,
    #[error("Design matrix has {rows} rows but the target has {targets} values.")]
    TargetLengthMismatch { rows: usize, targets: usize },
    #[error("Forest was configured with zero trees; at least one is required.")]
    NoTrees,
}

/// Hyperparameters of the ensemble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of bagged trees.
    pub trees: usize,
    /// Nodes holding fewer samples than this become leaves.
    pub min_samples_split: usize,
    /// Optional depth cap; `None` grows until purity or sample exhaustion.
    pub max_depth: Option<usize>,
    /// Seed for bootstrap resampling.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            min_samples_split: 2,
            max_depth: None,
            seed: 42,
        }
    }
}

/// One node of a fitted tree, stored in the flat arena of
/// [`DecisionTree::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TreeNode {
    /// Internal split: rows with `feature <= threshold` descend left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying the mean target of its training rows.
    Leaf { value: f64 },
}

/// A single CART regression tree. The root is node index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Grows a tree over the given sample rows (with repetition, for
    /// bootstrap resamples).
    fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        samples: Vec<usize>,
        config: &ForestConfig,
    ) -> Self {
        let mut nodes = Vec::new();
        grow(&mut nodes, x, y, samples, 0, config);
        Self { nodes }
    }

    /// Walks one encoded row from the root to a leaf.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of nodes in the fitted tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Recursively grows the subtree for `samples`, returning its root index.
fn grow(
    nodes: &mut Vec<TreeNode>,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    samples: Vec<usize>,
    depth: usize,
    config: &ForestConfig,
) -> usize {
    let mean = samples.iter().map(|&row| y[row]).sum::<f64>() / samples.len() as f64;
    let at_depth_cap = config.max_depth.is_some_and(|cap| depth >= cap);
    if samples.len() < config.min_samples_split || at_depth_cap {
        nodes.push(TreeNode::Leaf { value: mean });
        return nodes.len() - 1;
    }
    let Some(split) = best_split(x, y, &samples, mean) else {
        nodes.push(TreeNode::Leaf { value: mean });
        return nodes.len() - 1;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = samples
        .iter()
        .copied()
        .partition(|&row| x[[row, split.feature]] <= split.threshold);

    // Reserve this node's slot before descending so the root of each subtree
    // keeps a stable index.
    let slot = nodes.len();
    nodes.push(TreeNode::Leaf { value: mean });
    let left = grow(nodes, x, y, left_rows, depth + 1, config);
    let right = grow(nodes, x, y, right_rows, depth + 1, config);
    nodes[slot] = TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left,
        right,
    };
    slot
}

struct Candidate {
    feature: usize,
    threshold: f64,
    /// Summed squared error of both children under this split.
    sse: f64,
}

/// Exhaustive search for the split minimizing the children's summed squared
/// error. Returns `None` when the node is pure or no feature separates it.
fn best_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    samples: &[usize],
    mean: f64,
) -> Option<Candidate> {
    let n = samples.len() as f64;
    let parent_sse: f64 = samples
        .iter()
        .map(|&row| (y[row] - mean).powi(2))
        .sum();
    if parent_sse <= 1e-12 {
        return None;
    }
    let total: f64 = samples.iter().map(|&row| y[row]).sum();
    let total_sq: f64 = samples.iter().map(|&row| y[row] * y[row]).sum();

    let mut best: Option<Candidate> = None;
    let mut order = samples.to_vec();
    for feature in 0..x.ncols() {
        order.sort_unstable_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        // One pass over the sorted rows, maintaining prefix sums so each
        // candidate threshold costs O(1).
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for position in 0..order.len() - 1 {
            let value = y[order[position]];
            left_sum += value;
            left_sq += value * value;

            let here = x[[order[position], feature]];
            let next = x[[order[position + 1], feature]];
            if here == next {
                continue;
            }

            let left_n = (position + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);
            if best.as_ref().is_none_or(|current| sse < current.sse) {
                // Midpoint threshold; if rounding collapses it onto the upper
                // value, fall back to the lower so both children stay
                // non-empty.
                let mut threshold = 0.5 * (here + next);
                if threshold >= next {
                    threshold = here;
                }
                best = Some(Candidate {
                    feature,
                    threshold,
                    sse,
                });
            }
        }
    }
    best
}

/// A fitted bagged ensemble. Prediction is the mean over all trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fits `config.trees` trees, each on its own bootstrap resample of the
    /// rows of `x`.
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        config: &ForestConfig,
    ) -> Result<Self, ForestError> {
        if x.nrows() == 0 {
            return Err(ForestError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(ForestError::TargetLengthMismatch {
                rows: x.nrows(),
                targets: y.len(),
            });
        }
        if config.trees == 0 {
            return Err(ForestError::NoTrees);
        }

        let n = x.nrows();
        let trees = (0..config.trees)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_index as u64));
                let samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, samples, config)
            })
            .collect();
        Ok(Self { trees })
    }

    /// Number of fitted trees.
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean prediction across all trees for one encoded row.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict_row(row)).sum();
        total / self.trees.len() as f64
    }

    /// Predicts every row of an encoded design matrix.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| self.predict_row(row)))
    }
}
