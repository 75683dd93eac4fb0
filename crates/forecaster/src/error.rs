//! Forecast Error Types

use feature_engine::FeatureError;
use series::SeriesError;
use thiserror::Error;
use trainer::TrainerError;

/// Errors during forecasting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Invalid forecast configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot forecast without history")]
    EmptyHistory,

    #[error("Scenario names unknown covariates: {names:?}")]
    UnknownCovariates { names: Vec<String> },

    #[error("Scenario value for '{name}' is not finite{}", step.map(|s| format!(" (step {})", s)).unwrap_or_default())]
    NonFiniteOverride { name: String, step: Option<usize> },

    #[error("Scenario step {step} is outside the horizon 1..={horizon}")]
    StepOutOfRange { step: usize, horizon: usize },

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Trainer(#[from] TrainerError),
}
