//! Boosting Error Types

use thiserror::Error;

/// Errors raised while fitting or applying a boosted ensemble
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoostingError {
    #[error("Invalid boosting configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("Shape mismatch: {rows} rows but {targets} targets")]
    ShapeMismatch { rows: usize, targets: usize },

    #[error("Non-finite value at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize },

    #[error("Non-finite target at row {row}")]
    NonFiniteTarget { row: usize },

    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}
