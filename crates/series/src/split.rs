//! Chronological Train/Test Splitting

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SeriesError;
use crate::point::Dataset;

/// Below this many periods no held-out evaluation is attempted
pub const MIN_EVALUATION_PERIODS: usize = 5;

/// Default share of periods assigned to training
pub const DEFAULT_SPLIT_FRACTION: f64 = 0.8;

/// Chronological prefix/suffix partition of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Chronological prefix
    pub train: Dataset,
    /// Chronological suffix; empty when the series is too short to evaluate
    pub test: Dataset,
}

impl TrainTestSplit {
    /// Number of training periods (index of the first test period)
    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    /// Whether a held-out evaluation can be computed
    pub fn is_evaluable(&self) -> bool {
        !self.train.is_empty() && !self.test.is_empty()
    }
}

/// Splits a series into train and test without shuffling
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    split_fraction: f64,
}

impl Splitter {
    /// Create a splitter; the fraction must lie strictly between 0 and 1
    pub fn new(split_fraction: f64) -> Result<Self, SeriesError> {
        if !(split_fraction > 0.0 && split_fraction < 1.0) {
            return Err(SeriesError::invalid(
                "split",
                format!("split_fraction must be in (0, 1), got {}", split_fraction),
                Vec::new(),
            ));
        }
        Ok(Self { split_fraction })
    }

    /// Configured training share
    pub fn split_fraction(&self) -> f64 {
        self.split_fraction
    }

    /// Number of training periods for a series of `n` periods
    pub fn train_len(&self, n: usize) -> usize {
        if n < MIN_EVALUATION_PERIODS {
            return n;
        }
        ((n as f64 * self.split_fraction).floor() as usize).clamp(1, n - 1)
    }

    /// Partition a dataset chronologically
    pub fn split(&self, dataset: &Dataset) -> TrainTestSplit {
        let n = dataset.len();
        let train_len = self.train_len(n);

        if n < MIN_EVALUATION_PERIODS {
            warn!(
                "Only {} periods available (< {}); evaluation will not be computed",
                n, MIN_EVALUATION_PERIODS
            );
        }
        debug!("Split {} periods into train={} test={}", n, train_len, n - train_len);

        TrainTestSplit {
            train: dataset.slice(0..train_len),
            test: dataset.slice(train_len..n),
        }
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            split_fraction: DEFAULT_SPLIT_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::TimeSeriesPoint;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn weekly(n: usize) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let points = (0..n)
            .map(|i| TimeSeriesPoint::new(start + Duration::weeks(i as i64), 100.0 + i as f64))
            .collect();
        Dataset::new(points).unwrap()
    }

    #[test]
    fn test_split_58_periods() {
        let split = Splitter::default().split(&weekly(58));
        assert_eq!(split.train.len(), 46);
        assert_eq!(split.test.len(), 12);
        let last_train = split.train.last().unwrap().period_start;
        let first_test = split.test.points()[0].period_start;
        assert!(last_train < first_test);
    }

    #[test]
    fn test_short_series_not_evaluable() {
        let split = Splitter::default().split(&weekly(4));
        assert_eq!(split.train.len(), 4);
        assert!(split.test.is_empty());
        assert!(!split.is_evaluable());
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        assert!(Splitter::new(0.0).is_err());
        assert!(Splitter::new(1.0).is_err());
        assert!(Splitter::new(f64::NAN).is_err());
        assert!(Splitter::new(0.5).is_ok());
    }

    proptest! {
        #[test]
        fn prop_split_is_chronological(n in 0usize..120, fraction in 0.01f64..0.99) {
            let dataset = weekly(n);
            let split = Splitter::new(fraction).unwrap().split(&dataset);
            prop_assert_eq!(split.train.len() + split.test.len(), n);
            if let (Some(last), Some(first)) = (split.train.last(), split.test.points().first()) {
                prop_assert!(last.period_start < first.period_start);
            }
            if n >= MIN_EVALUATION_PERIODS {
                prop_assert!(split.is_evaluable());
            }
        }
    }
}
