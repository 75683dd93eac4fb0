//! Forecast Summary

use chrono::NaiveDate;
use forecaster::ForecastPoint;
use serde::{Deserialize, Serialize};
use series::Dataset;

/// A period and its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period_start: NaiveDate,
    pub value: f64,
}

/// Headline numbers of a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub horizon: usize,
    pub first_period: NaiveDate,
    pub last_period: NaiveDate,
    pub total: f64,
    /// Mean prediction per period
    pub mean: f64,
    pub peak: PeriodValue,
    pub trough: PeriodValue,
    /// Sum of the same number of most recent actual periods
    pub recent_actual_total: f64,
    /// Percent change of `total` over `recent_actual_total`; absent when that is zero
    pub growth_pct: Option<f64>,
}

impl ForecastSummary {
    /// Summarize forecast points against the history; `None` for an empty forecast
    pub fn from_points(points: &[ForecastPoint], history: &Dataset) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;

        let total: f64 = points.iter().map(|p| p.predicted_value).sum();
        let peak = points.iter().fold(first, |best, p| {
            if p.predicted_value > best.predicted_value {
                p
            } else {
                best
            }
        });
        let trough = points.iter().fold(first, |best, p| {
            if p.predicted_value < best.predicted_value {
                p
            } else {
                best
            }
        });

        let targets = history.targets();
        let recent = &targets[targets.len().saturating_sub(points.len())..];
        let recent_actual_total: f64 = recent.iter().sum();
        let growth_pct = if recent_actual_total > 0.0 {
            Some((total / recent_actual_total - 1.0) * 100.0)
        } else {
            None
        };

        Some(Self {
            horizon: points.len(),
            first_period: first.period_start,
            last_period: last.period_start,
            total,
            mean: total / points.len() as f64,
            peak: PeriodValue {
                period_start: peak.period_start,
                value: peak.predicted_value,
            },
            trough: PeriodValue {
                period_start: trough.period_start,
                value: trough.predicted_value,
            },
            recent_actual_total,
            growth_pct,
        })
    }
}
