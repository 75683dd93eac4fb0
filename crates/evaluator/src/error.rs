//! Evaluation Error Types

use thiserror::Error;
use trainer::TrainerError;

/// Errors during model evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Invalid evaluator configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot score {actual} actuals against {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },

    #[error("Cannot score an empty set of predictions")]
    EmptyInput,

    #[error(transparent)]
    Trainer(#[from] TrainerError),
}
