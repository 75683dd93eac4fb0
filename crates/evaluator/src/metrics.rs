//! Forecast Accuracy Metrics
//!
//! Percentage errors skip periods whose actual value is zero; when no period
//! qualifies, MAPE and accuracy are absent rather than infinite.

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;

/// Mean absolute error
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Root mean squared error
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n as f64;
    mse.sqrt()
}

/// Mean absolute percentage error in percent, over nonzero actuals
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.iter().sum::<f64>() / errors.len() as f64 * 100.0)
    }
}

/// Coefficient of determination; 0 when the actuals have no variance
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    1.0 - ss_res / ss_tot
}

/// `max(0, 100 - MAPE)`
pub fn accuracy(mape: Option<f64>) -> Option<f64> {
    mape.map(|m| (100.0 - m).max(0.0))
}

/// Scores of one set of predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub rmse: f64,
    pub mape: Option<f64>,
    pub r_squared: f64,
    pub accuracy: Option<f64>,
    /// Periods scored
    pub periods: usize,
    /// Periods that entered MAPE
    pub mape_periods: usize,
}

impl Metrics {
    /// Score predictions against actuals
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self, EvaluationError> {
        if actual.len() != predicted.len() {
            return Err(EvaluationError::LengthMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }
        if actual.is_empty() {
            return Err(EvaluationError::EmptyInput);
        }

        let mape = mape(actual, predicted);
        Ok(Self {
            mae: mae(actual, predicted),
            rmse: rmse(actual, predicted),
            mape,
            r_squared: r_squared(actual, predicted),
            accuracy: accuracy(mape),
            periods: actual.len(),
            mape_periods: actual.iter().filter(|a| **a != 0.0).count(),
        })
    }
}
