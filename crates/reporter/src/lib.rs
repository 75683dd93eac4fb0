//! Reporting
//!
//! Read-only views over fitted models and forecasts: ranked feature
//! importance, forecast summaries and a reliability tier derived from
//! hold-out accuracy.

mod importance;
mod reliability;
mod summary;

pub use importance::{group_importance, rank_features, FeatureImportance, GroupImportance};
pub use reliability::{Reliability, ReliabilityThresholds};
pub use summary::{ForecastSummary, PeriodValue};
