//! Evaluator configuration

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;

/// How the training segment is cut into validation folds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvStrategy {
    /// Contiguous, unshuffled folds; each fold trains on all other folds
    #[default]
    KFold,
    /// Forward chaining; each fold trains only on earlier periods
    Expanding,
}

impl CvStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvStrategy::KFold => "k_fold",
            CvStrategy::Expanding => "expanding",
        }
    }
}

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Number of cross-validation folds (default: 5)
    pub cv_folds: usize,
    /// Fold construction
    pub cv_strategy: CvStrategy,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            cv_folds: 5,
            cv_strategy: CvStrategy::KFold,
        }
    }
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.cv_folds < 2 {
            return Err(EvaluationError::InvalidConfig(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        Ok(())
    }

    /// Fewest training periods cross-validation runs on
    pub fn min_cv_periods(&self) -> usize {
        2 * self.cv_folds
    }
}
