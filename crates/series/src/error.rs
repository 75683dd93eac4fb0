//! Series Error Types

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building a series or stepping through its calendar
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Malformed input: unsorted, duplicated, negative or non-finite values
    #[error("invalid input at {stage}: {reason} (periods: {periods:?})")]
    InvalidInput {
        stage: &'static str,
        reason: String,
        periods: Vec<NaiveDate>,
    },
}

impl SeriesError {
    pub(crate) fn invalid(stage: &'static str, reason: impl Into<String>, periods: Vec<NaiveDate>) -> Self {
        SeriesError::InvalidInput {
            stage,
            reason: reason.into(),
            periods,
        }
    }
}
