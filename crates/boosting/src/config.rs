//! Boosting configuration

use serde::{Deserialize, Serialize};

use crate::error::BoostingError;

/// Hyperparameters of the boosted ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingConfig {
    /// Number of trees
    pub tree_count: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f64,
    /// Fraction of rows sampled per tree
    pub subsample_fraction: f64,
    /// Fraction of features sampled per tree
    pub colsample_fraction: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
    /// L2 regularization on leaf weights
    pub reg_lambda: f64,
    /// Minimum gain to accept a split
    pub gamma: f64,
    /// Seed of the sampling generator
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            tree_count: 200,
            max_depth: 6,
            learning_rate: 0.05,
            subsample_fraction: 0.85,
            colsample_fraction: 0.85,
            min_child_weight: 1.0,
            reg_lambda: 1.0,
            gamma: 0.0,
            seed: 42,
        }
    }
}

impl BoostingConfig {
    /// Check every parameter is in range
    pub fn validate(&self) -> Result<(), BoostingError> {
        if self.tree_count == 0 {
            return Err(BoostingError::InvalidConfig("tree_count must be positive".into()));
        }
        if self.max_depth == 0 {
            return Err(BoostingError::InvalidConfig("max_depth must be positive".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(BoostingError::InvalidConfig(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        for (name, value) in [("subsample_fraction", self.subsample_fraction), ("colsample_fraction", self.colsample_fraction)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(BoostingError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("min_child_weight", self.min_child_weight),
            ("reg_lambda", self.reg_lambda),
            ("gamma", self.gamma),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(BoostingError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BoostingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let bad = [
            BoostingConfig { tree_count: 0, ..Default::default() },
            BoostingConfig { learning_rate: 0.0, ..Default::default() },
            BoostingConfig { subsample_fraction: 1.5, ..Default::default() },
            BoostingConfig { colsample_fraction: f64::NAN, ..Default::default() },
            BoostingConfig { reg_lambda: -1.0, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }
}
