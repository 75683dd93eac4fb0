//! Prediction Intervals

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ForecastError;

/// Lower and upper bound around a prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    pub low: f64,
    pub high: f64,
}

impl PredictionInterval {
    /// Whether `value` lies inside the bounds
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Symmetric normal interval widening with the square root of the step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalEstimator {
    z: f64,
    scale: f64,
}

impl IntervalEstimator {
    /// Interval of two-sided `confidence` around a residual scale (held-out RMSE)
    pub fn new(confidence: f64, scale: f64) -> Result<Self, ForecastError> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "interval confidence must be in (0, 1), got {}",
                confidence
            )));
        }
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "residual scale must be a non-negative number, got {}",
                scale
            )));
        }
        let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidConfig(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + confidence / 2.0);
        Ok(Self { z, scale })
    }

    /// Normal quantile used for the half-width
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Interval for a prediction `step` periods ahead; low is floored at zero
    pub fn bounds(&self, prediction: f64, step: usize) -> PredictionInterval {
        let half_width = self.z * self.scale * (step as f64).sqrt();
        PredictionInterval {
            low: (prediction - half_width).max(0.0),
            high: prediction + half_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ninety_five_percent_quantile() {
        let estimator = IntervalEstimator::new(0.95, 10.0).unwrap();
        assert_relative_eq!(estimator.z(), 1.959964, epsilon = 1e-5);
    }

    #[test]
    fn test_bounds_widen_and_floor() {
        let estimator = IntervalEstimator::new(0.95, 10.0).unwrap();
        let one = estimator.bounds(100.0, 1);
        let four = estimator.bounds(100.0, 4);
        assert_relative_eq!(four.high - 100.0, 2.0 * (one.high - 100.0), epsilon = 1e-9);
        assert!(four.low < one.low);
        assert!(four.contains(100.0));

        assert_eq!(estimator.bounds(5.0, 9).low, 0.0);
    }

    #[test]
    fn test_invalid_scale() {
        assert!(IntervalEstimator::new(0.95, f64::NAN).is_err());
        assert!(IntervalEstimator::new(0.0, 1.0).is_err());
    }
}
