//! Gradient Boosted Regressor
//!
//! Squared-error boosting: every round fits a tree to the gradient
//! `prediction - target` (hessian 1) over a seeded sample of rows and
//! features, then adds the shrunken tree output to every row's prediction.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BoostingConfig;
use crate::error::BoostingError;
use crate::tree::{TreeBuilder, TreeNode};

/// Fitted ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    config: BoostingConfig,
    base_score: f64,
    trees: Vec<TreeNode>,
    feature_count: usize,
    gains: Vec<f64>,
}

impl GradientBoostingRegressor {
    /// Fit an ensemble on a dense, finite design matrix
    pub fn fit(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, config: &BoostingConfig) -> Result<Self, BoostingError> {
        config.validate()?;

        let (rows, cols) = x.dim();
        if rows == 0 {
            return Err(BoostingError::EmptyTrainingSet);
        }
        if rows != y.len() {
            return Err(BoostingError::ShapeMismatch {
                rows,
                targets: y.len(),
            });
        }
        if let Some(((row, column), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(BoostingError::NonFiniteInput { row, column });
        }
        if let Some(row) = y.iter().position(|v| !v.is_finite()) {
            return Err(BoostingError::NonFiniteTarget { row });
        }

        let base_score = y.sum() / rows as f64;
        let mut predictions = Array1::from_elem(rows, base_score);
        let hess = vec![1.0; rows];
        let mut gains = vec![0.0; cols];
        let mut trees = Vec::with_capacity(config.tree_count);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);

        for round in 0..config.tree_count {
            let grad: Vec<f64> = predictions.iter().zip(y.iter()).map(|(p, t)| p - t).collect();
            let sampled_rows = sample_indices(&mut rng, rows, config.subsample_fraction);
            let sampled_features = sample_indices(&mut rng, cols, config.colsample_fraction);

            let tree = TreeBuilder::new(x.view(), &grad, &hess, &sampled_features, config).build(&sampled_rows, &mut gains);

            for (i, prediction) in predictions.iter_mut().enumerate() {
                let sample = x.row(i).to_vec();
                *prediction += config.learning_rate * tree.predict(&sample);
            }

            if (round + 1) % 50 == 0 {
                let mse = predictions
                    .iter()
                    .zip(y.iter())
                    .map(|(p, t)| (p - t).powi(2))
                    .sum::<f64>()
                    / rows as f64;
                debug!("Boosting round {}: train MSE {:.4}", round + 1, mse);
            }

            trees.push(tree);
        }

        info!(
            "Fitted {} trees on {} rows x {} features (base score {:.3})",
            trees.len(),
            rows,
            cols,
            base_score
        );

        Ok(Self {
            config: config.clone(),
            base_score,
            trees,
            feature_count: cols,
            gains,
        })
    }

    /// Predict one sample
    pub fn predict_row(&self, sample: &[f64]) -> Result<f64, BoostingError> {
        if sample.len() != self.feature_count {
            return Err(BoostingError::FeatureCountMismatch {
                expected: self.feature_count,
                actual: sample.len(),
            });
        }
        let boost: f64 = self.trees.iter().map(|t| t.predict(sample)).sum();
        Ok(self.base_score + self.config.learning_rate * boost)
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, BoostingError> {
        if x.ncols() != self.feature_count {
            return Err(BoostingError::FeatureCountMismatch {
                expected: self.feature_count,
                actual: x.ncols(),
            });
        }
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(&row.to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from_vec)
    }

    /// Total split gain per feature, normalized to sum to 1
    ///
    /// An ensemble without splits spreads importance uniformly.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.gains.iter().sum();
        if total > 0.0 {
            self.gains.iter().map(|g| g / total).collect()
        } else if self.feature_count > 0 {
            vec![1.0 / self.feature_count as f64; self.feature_count]
        } else {
            Vec::new()
        }
    }

    /// Raw (unnormalized) split gain per feature
    pub fn total_gains(&self) -> &[f64] {
        &self.gains
    }

    /// Mean of the training targets
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Fitted trees
    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }

    /// Width of the design matrix seen at fit time
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Configuration used for fitting
    pub fn config(&self) -> &BoostingConfig {
        &self.config
    }
}

/// Sorted sample of `ceil(n * ratio)` indices out of `0..n`
fn sample_indices(rng: &mut Xoshiro256PlusPlus, n: usize, ratio: f64) -> Vec<usize> {
    if ratio >= 1.0 || n == 0 {
        return (0..n).collect();
    }
    let k = ((n as f64 * ratio).ceil() as usize).clamp(1, n);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(k);
    indices.sort_unstable();
    indices
}
