//! Calendar Aggregation of forecast periods

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::forecaster::ForecastPoint;
use crate::interval::PredictionInterval;

/// Calendar bucket for period totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Month,
    Quarter,
}

impl Aggregation {
    /// First day of the bucket holding `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Aggregation::Month => date.month(),
            Aggregation::Quarter => (date.month() - 1) / 3 * 3 + 1,
        };
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }

    /// Display label of the bucket holding `date`
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Aggregation::Month => format!("{}-{:02}", date.year(), date.month()),
            Aggregation::Quarter => format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
        }
    }
}

/// Sum of forecast periods starting inside one calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub label: String,
    pub bucket_start: NaiveDate,
    /// Forecast periods in the bucket
    pub periods: usize,
    pub total: f64,
    /// Summed bounds, when every period carries an interval
    pub interval: Option<PredictionInterval>,
}

/// Group points by the bucket of their period start, in chronological order
pub fn aggregate(points: &[ForecastPoint], aggregation: Aggregation) -> Vec<PeriodTotal> {
    let mut totals: Vec<PeriodTotal> = Vec::new();

    for point in points {
        let bucket_start = aggregation.bucket_start(point.period_start);
        match totals.last_mut() {
            Some(total) if total.bucket_start == bucket_start => {
                total.periods += 1;
                total.total += point.predicted_value;
                total.interval = total.interval.zip(point.interval).map(|(a, b)| PredictionInterval {
                    low: a.low + b.low,
                    high: a.high + b.high,
                });
            }
            _ => totals.push(PeriodTotal {
                label: aggregation.label(point.period_start),
                bucket_start,
                periods: 1,
                total: point.predicted_value,
                interval: point.interval,
            }),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(step: usize, date: NaiveDate, predicted_value: f64) -> ForecastPoint {
        ForecastPoint {
            step,
            period_start: date,
            predicted_value,
            interval: None,
        }
    }

    #[test]
    fn test_monthly_totals() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let points: Vec<ForecastPoint> = (0..4)
            .map(|i| point(i + 1, start + chrono::Duration::weeks(i as i64), 10.0))
            .collect();

        // Jan 20, Jan 27, Feb 3, Feb 10
        let totals = aggregate(&points, Aggregation::Month);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].label, "2025-01");
        assert_eq!(totals[0].periods, 2);
        assert_eq!(totals[1].total, 20.0);
        assert_eq!(totals[1].interval, None);
    }

    #[test]
    fn test_quarter_buckets() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        assert_eq!(Aggregation::Quarter.label(date), "2025-Q3");
        assert_eq!(
            Aggregation::Quarter.bucket_start(date),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_interval_sums() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let mut a = point(1, date, 10.0);
        a.interval = Some(PredictionInterval { low: 8.0, high: 12.0 });
        let mut b = point(2, date + chrono::Duration::weeks(1), 20.0);
        b.interval = Some(PredictionInterval { low: 15.0, high: 25.0 });

        let totals = aggregate(&[a, b], Aggregation::Quarter);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].interval, Some(PredictionInterval { low: 23.0, high: 37.0 }));
    }
}
