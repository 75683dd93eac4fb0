//! Period Cadence

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::point::TimeSeriesPoint;

/// Default period length (weekly series)
pub const DEFAULT_PERIOD_DAYS: i64 = 7;

/// Longest accepted period (one leap year)
pub const MAX_PERIOD_DAYS: i64 = 366;

/// Fixed day distance between consecutive periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    days: i64,
}

impl Cadence {
    /// Cadence of an explicit number of days, between 1 and `MAX_PERIOD_DAYS`
    pub fn from_days(days: i64) -> Result<Self, SeriesError> {
        if !(1..=MAX_PERIOD_DAYS).contains(&days) {
            return Err(SeriesError::invalid(
                "cadence",
                format!(
                    "period length must be between 1 and {} days, got {}",
                    MAX_PERIOD_DAYS, days
                ),
                Vec::new(),
            ));
        }
        Ok(Self { days })
    }

    /// Weekly cadence
    pub fn weekly() -> Self {
        Self {
            days: DEFAULT_PERIOD_DAYS,
        }
    }

    /// Infer from the most recent gap; falls back to weekly for single-point series
    pub fn infer(points: &[TimeSeriesPoint]) -> Self {
        match points {
            [.., prev, last] => {
                let days = (last.period_start - prev.period_start).num_days();
                if days > 0 {
                    Self { days }
                } else {
                    Self::weekly()
                }
            }
            _ => Self::weekly(),
        }
    }

    /// Period length in days
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Start of the period `steps` periods after `origin`
    ///
    /// Fails when the date falls outside the supported calendar.
    pub fn advance(&self, origin: NaiveDate, steps: usize) -> Result<NaiveDate, SeriesError> {
        u64::try_from(self.days)
            .ok()
            .zip(u64::try_from(steps).ok())
            .and_then(|(days, steps)| days.checked_mul(steps))
            .and_then(|offset| origin.checked_add_days(Days::new(offset)))
            .ok_or_else(|| {
                SeriesError::invalid(
                    "cadence",
                    format!(
                        "{} periods of {} days after {} is outside the calendar",
                        steps, self.days, origin
                    ),
                    vec![origin],
                )
            })
    }

    /// The `count` period starts following `origin`
    pub fn following(&self, origin: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, SeriesError> {
        (1..=count).map(|step| self.advance(origin, step)).collect()
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::weekly()
    }
}
