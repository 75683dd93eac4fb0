//! Engine Error Taxonomy
//!
//! Component errors are folded into five kinds. Every kind names the stage
//! that failed; input errors also carry the offending periods.

use boosting::BoostingError;
use chrono::NaiveDate;
use evaluator::EvaluationError;
use feature_engine::FeatureError;
use forecaster::ForecastError;
use series::SeriesError;
use thiserror::Error;
use trainer::TrainerError;

pub const STAGE_CONFIG: &str = "configuration";
pub const STAGE_FEATURES: &str = "feature-engineering";
pub const STAGE_TRAINING: &str = "training";
pub const STAGE_EVALUATION: &str = "evaluation";
pub const STAGE_FORECAST: &str = "forecasting";

/// Errors surfaced to engine callers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input at {stage}: {reason}{}", format_periods(.periods))]
    InvalidInput {
        stage: &'static str,
        reason: String,
        periods: Vec<NaiveDate>,
    },

    #[error("insufficient data at {stage}: need at least {required} periods, got {actual}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("feature mismatch at {stage}: missing {missing:?}, unexpected {unexpected:?}")]
    FeatureMismatch {
        stage: &'static str,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("{stage} exceeded its time limit of {limit_ms}ms")]
    TrainingTimeout { stage: &'static str, limit_ms: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

fn format_periods(periods: &[NaiveDate]) -> String {
    if periods.is_empty() {
        String::new()
    } else {
        let list: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
        format!(" (periods: {})", list.join(", "))
    }
}

impl EngineError {
    pub(crate) fn invalid(stage: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            stage,
            reason: reason.into(),
            periods: Vec::new(),
        }
    }

    /// Stage that raised the error
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { stage, .. }
            | EngineError::InsufficientData { stage, .. }
            | EngineError::FeatureMismatch { stage, .. }
            | EngineError::TrainingTimeout { stage, .. } => stage,
            EngineError::Config(_) => STAGE_CONFIG,
        }
    }

    pub(crate) fn from_feature(stage: &'static str, err: FeatureError) -> Self {
        match err {
            FeatureError::InvalidConfig(reason) => EngineError::invalid(stage, reason),
            FeatureError::FeatureMismatch { missing, unexpected } => EngineError::FeatureMismatch {
                stage,
                missing,
                unexpected,
            },
            FeatureError::EmptyHistory => EngineError::InsufficientData {
                stage,
                required: 1,
                actual: 0,
            },
        }
    }

    pub(crate) fn from_boosting(stage: &'static str, err: BoostingError) -> Self {
        match err {
            BoostingError::EmptyTrainingSet => EngineError::InsufficientData {
                stage,
                required: 1,
                actual: 0,
            },
            other => EngineError::invalid(stage, other.to_string()),
        }
    }

    pub(crate) fn from_trainer(stage: &'static str, err: TrainerError) -> Self {
        match err {
            TrainerError::EmptyTrainingSet => EngineError::InsufficientData {
                stage,
                required: 1,
                actual: 0,
            },
            TrainerError::WidthMismatch {
                period,
                expected,
                actual,
            } => EngineError::FeatureMismatch {
                stage,
                missing: vec![format!("{} declared features", expected)],
                unexpected: vec![format!("{} values for {}", actual, period)],
            },
            TrainerError::NonFiniteTarget { period } => EngineError::InvalidInput {
                stage,
                reason: "target is not finite".to_string(),
                periods: vec![period],
            },
            err @ TrainerError::TargetCountMismatch { .. } => EngineError::invalid(stage, err.to_string()),
            TrainerError::Feature(err) => Self::from_feature(stage, err),
            TrainerError::Boosting(err) => Self::from_boosting(stage, err),
        }
    }
}

impl From<SeriesError> for EngineError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::InvalidInput {
                stage,
                reason,
                periods,
            } => EngineError::InvalidInput {
                stage,
                reason,
                periods,
            },
        }
    }
}

impl From<FeatureError> for EngineError {
    fn from(err: FeatureError) -> Self {
        Self::from_feature(STAGE_FEATURES, err)
    }
}

impl From<TrainerError> for EngineError {
    fn from(err: TrainerError) -> Self {
        Self::from_trainer(STAGE_TRAINING, err)
    }
}

impl From<EvaluationError> for EngineError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Trainer(err) => Self::from_trainer(STAGE_EVALUATION, err),
            EvaluationError::EmptyInput => EngineError::InsufficientData {
                stage: STAGE_EVALUATION,
                required: 1,
                actual: 0,
            },
            other => EngineError::invalid(STAGE_EVALUATION, other.to_string()),
        }
    }
}

impl From<ForecastError> for EngineError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::EmptyHistory => EngineError::InsufficientData {
                stage: STAGE_FORECAST,
                required: 1,
                actual: 0,
            },
            ForecastError::UnknownCovariates { names } => EngineError::FeatureMismatch {
                stage: STAGE_FORECAST,
                missing: Vec::new(),
                unexpected: names,
            },
            ForecastError::Series(err) => err.into(),
            ForecastError::Feature(err) => Self::from_feature(STAGE_FORECAST, err),
            ForecastError::Trainer(err) => Self::from_trainer(STAGE_FORECAST, err),
            other => EngineError::invalid(STAGE_FORECAST, other.to_string()),
        }
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scenario_covariate_maps_to_mismatch() {
        let err: EngineError = ForecastError::UnknownCovariates {
            names: vec!["tv_spend".to_string()],
        }
        .into();
        assert_eq!(
            err,
            EngineError::FeatureMismatch {
                stage: STAGE_FORECAST,
                missing: vec![],
                unexpected: vec!["tv_spend".to_string()],
            }
        );
    }

    #[test]
    fn test_trainer_errors_keep_stage() {
        let err: EngineError = EvaluationError::Trainer(TrainerError::EmptyTrainingSet).into();
        assert_eq!(err.stage(), STAGE_EVALUATION);
        assert!(matches!(err, EngineError::InsufficientData { .. }));
    }

    #[test]
    fn test_invalid_input_lists_periods() {
        let period = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let err = EngineError::from(SeriesError::InvalidInput {
            stage: "dataset-validation",
            reason: "duplicate period".to_string(),
            periods: vec![period],
        });
        assert_eq!(
            err.to_string(),
            "invalid input at dataset-validation: duplicate period (periods: 2024-03-04)"
        );
    }

    #[test]
    fn test_calendar_overflow_maps_to_invalid_input() {
        let origin = NaiveDate::MAX;
        let err: EngineError = ForecastError::Series(series::Cadence::weekly().advance(origin, 1).unwrap_err()).into();
        match err {
            EngineError::InvalidInput { stage, periods, .. } => {
                assert_eq!(stage, "cadence");
                assert_eq!(periods, vec![origin]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
