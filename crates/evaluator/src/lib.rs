//! Model Evaluation
//!
//! Hold-out metrics (MAE, RMSE, MAPE, R², accuracy) and cross-validation
//! for models trained on the chronological head of a series.

mod config;
mod error;
mod evaluator;
mod folds;
pub mod metrics;

pub use config::{CvStrategy, EvaluatorConfig};
pub use error::EvaluationError;
pub use evaluator::{clamped, CrossValidation, EvaluationOutcome, EvaluationReport, Evaluator, PeriodPrediction};
pub use folds::{folds, Fold};
pub use metrics::Metrics;
