//! Sales Series
//!
//! Validated, chronologically ordered period series plus the chronological
//! train/test splitter used by evaluation.

mod cadence;
mod error;
mod point;
mod split;
mod validator;

pub use cadence::{Cadence, DEFAULT_PERIOD_DAYS, MAX_PERIOD_DAYS};
pub use error::SeriesError;
pub use point::{Dataset, TimeSeriesPoint};
pub use split::{Splitter, TrainTestSplit, DEFAULT_SPLIT_FRACTION, MIN_EVALUATION_PERIODS};
pub use validator::Validator;
