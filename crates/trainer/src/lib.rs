//! Model Training
//!
//! Turns feature vectors and targets into a fitted [`Model`] that carries its
//! feature spec, the frozen imputation values and the boosted ensemble.

mod imputer;
mod model;

pub use boosting::BoostingConfig as Hyperparameters;
pub use imputer::Imputer;
pub use model::{Model, Trainer};

use boosting::BoostingError;
use chrono::NaiveDate;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during training or model inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainerError {
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Got {vectors} feature vectors but {targets} targets")]
    TargetCountMismatch { vectors: usize, targets: usize },
    #[error("Vector for {period} has {actual} values, spec declares {expected}")]
    WidthMismatch {
        period: NaiveDate,
        expected: usize,
        actual: usize,
    },
    #[error("Non-finite target for {period}")]
    NonFiniteTarget { period: NaiveDate },
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Boosting(#[from] BoostingError),
}
