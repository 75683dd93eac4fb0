//! Sales Forecasting
//!
//! Retrains on the full history, projects future periods under a covariate
//! scenario, attaches optional prediction intervals and rolls periods up into
//! calendar months or quarters.

mod aggregate;
mod config;
mod error;
mod forecaster;
mod interval;
mod scenario;

pub use aggregate::{aggregate, Aggregation, PeriodTotal};
pub use config::ForecastConfig;
pub use error::ForecastError;
pub use forecaster::{Forecast, ForecastMode, ForecastPoint, Forecaster};
pub use interval::{IntervalEstimator, PredictionInterval};
pub use scenario::{trailing_means, Scenario};
