//! Series Validator for Ordering and Range Checking

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::SeriesError;
use crate::point::TimeSeriesPoint;

const STAGE: &str = "dataset-validation";

/// Validator for incoming series points
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Check every invariant of a series; the first violated rule is reported
    /// together with every period that violates it.
    pub fn validate(&self, points: &[TimeSeriesPoint]) -> Result<(), SeriesError> {
        self.validate_order(points)?;
        self.validate_targets(points)?;
        self.validate_covariates(points)?;
        debug!("Validated {} periods", points.len());
        Ok(())
    }

    /// Period starts must be strictly increasing (sorted and unique)
    pub fn validate_order(&self, points: &[TimeSeriesPoint]) -> Result<(), SeriesError> {
        let duplicated: Vec<NaiveDate> = points
            .windows(2)
            .filter(|w| w[0].period_start == w[1].period_start)
            .map(|w| w[1].period_start)
            .collect();
        if !duplicated.is_empty() {
            warn!("Rejected series with {} duplicated periods", duplicated.len());
            return Err(SeriesError::invalid(STAGE, "duplicate period_start", duplicated));
        }

        let unsorted: Vec<NaiveDate> = points
            .windows(2)
            .filter(|w| w[0].period_start > w[1].period_start)
            .map(|w| w[1].period_start)
            .collect();
        if !unsorted.is_empty() {
            warn!("Rejected series with {} out-of-order periods", unsorted.len());
            return Err(SeriesError::invalid(STAGE, "period_start not increasing", unsorted));
        }

        Ok(())
    }

    /// Targets must be finite and non-negative
    pub fn validate_targets(&self, points: &[TimeSeriesPoint]) -> Result<(), SeriesError> {
        let bad: Vec<NaiveDate> = points
            .iter()
            .filter(|p| !p.target_value.is_finite() || p.target_value < 0.0)
            .map(|p| p.period_start)
            .collect();
        if bad.is_empty() {
            Ok(())
        } else {
            Err(SeriesError::invalid(
                STAGE,
                "target_value must be finite and >= 0",
                bad,
            ))
        }
    }

    /// Covariates must be finite and carry a non-empty name
    pub fn validate_covariates(&self, points: &[TimeSeriesPoint]) -> Result<(), SeriesError> {
        let bad: Vec<NaiveDate> = points
            .iter()
            .filter(|p| {
                p.covariates
                    .iter()
                    .any(|(name, value)| name.trim().is_empty() || !value.is_finite())
            })
            .map(|p| p.period_start)
            .collect();
        if bad.is_empty() {
            Ok(())
        } else {
            Err(SeriesError::invalid(
                STAGE,
                "covariates must be named and finite",
                bad,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_duplicate_periods_rejected() {
        let points = vec![
            TimeSeriesPoint::new(date(1), 1.0),
            TimeSeriesPoint::new(date(8), 2.0),
            TimeSeriesPoint::new(date(8), 3.0),
        ];
        match Validator.validate(&points) {
            Err(SeriesError::InvalidInput { periods, reason, .. }) => {
                assert_eq!(periods, vec![date(8)]);
                assert!(reason.contains("duplicate"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unsorted_periods_rejected() {
        let points = vec![
            TimeSeriesPoint::new(date(15), 1.0),
            TimeSeriesPoint::new(date(8), 2.0),
        ];
        assert!(matches!(
            Validator.validate(&points),
            Err(SeriesError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_and_nan_targets_rejected() {
        let points = vec![
            TimeSeriesPoint::new(date(1), -1.0),
            TimeSeriesPoint::new(date(8), f64::NAN),
            TimeSeriesPoint::new(date(15), 0.0),
        ];
        match Validator.validate(&points) {
            Err(SeriesError::InvalidInput { periods, .. }) => {
                assert_eq!(periods, vec![date(1), date(8)]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_covariate_rejected() {
        let points = vec![TimeSeriesPoint::new(date(1), 1.0).with_covariate("buyers", f64::INFINITY)];
        assert!(Validator.validate(&points).is_err());
    }

    #[test]
    fn test_empty_series_is_valid() {
        assert!(Validator.validate(&[]).is_ok());
    }
}
