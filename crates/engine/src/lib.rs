//! Sales Forecasting Engine
//!
//! Ties the pipeline stages together behind one configuration and one
//! error type:
//!
//! ```text
//! points -> Dataset -> FeatureEngineer -> Evaluator (hold-out + CV)
//!                                      -> Forecaster (retrain + project)
//!                                      -> Reporter (importance, summary)
//! ```

mod config;
mod error;
mod session;

pub use config::{EngineConfig, ENV_PREFIX};
pub use error::{EngineError, STAGE_CONFIG, STAGE_EVALUATION, STAGE_FEATURES, STAGE_FORECAST, STAGE_TRAINING};
pub use session::{ForecastSession, HistorySpan, SessionReport};

pub use evaluator::{EvaluationOutcome, EvaluationReport};
pub use forecaster::{Forecast, ForecastPoint, Scenario};
pub use series::TimeSeriesPoint;
