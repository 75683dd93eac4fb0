//! Calendar Features

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar attribute derived from a period start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarField {
    /// ISO week number (1-53)
    WeekOfYear,
    /// Month (1-12)
    Month,
    /// Quarter (1-4)
    Quarter,
    /// Calendar year
    Year,
    /// Period starts in the first 7 days of the month
    IsMonthStart,
    /// Period starts on or after the 22nd
    IsMonthEnd,
}

impl CalendarField {
    /// All calendar fields in feature order
    pub const ALL: [CalendarField; 6] = [
        CalendarField::WeekOfYear,
        CalendarField::Month,
        CalendarField::Quarter,
        CalendarField::Year,
        CalendarField::IsMonthStart,
        CalendarField::IsMonthEnd,
    ];

    /// Feature name
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarField::WeekOfYear => "week_of_year",
            CalendarField::Month => "month",
            CalendarField::Quarter => "quarter",
            CalendarField::Year => "year",
            CalendarField::IsMonthStart => "is_month_start",
            CalendarField::IsMonthEnd => "is_month_end",
        }
    }

    /// Value for a date
    pub fn value(&self, date: NaiveDate) -> f64 {
        match self {
            CalendarField::WeekOfYear => date.iso_week().week() as f64,
            CalendarField::Month => date.month() as f64,
            CalendarField::Quarter => ((date.month() - 1) / 3 + 1) as f64,
            CalendarField::Year => date.year() as f64,
            CalendarField::IsMonthStart => flag(date.day() <= 7),
            CalendarField::IsMonthEnd => flag(date.day() >= 22),
        }
    }
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_values() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 25).unwrap();
        assert_eq!(CalendarField::WeekOfYear.value(date), 48.0);
        assert_eq!(CalendarField::Month.value(date), 11.0);
        assert_eq!(CalendarField::Quarter.value(date), 4.0);
        assert_eq!(CalendarField::Year.value(date), 2024.0);
        assert_eq!(CalendarField::IsMonthStart.value(date), 0.0);
        assert_eq!(CalendarField::IsMonthEnd.value(date), 1.0);
    }

    #[test]
    fn test_iso_week_crosses_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(CalendarField::WeekOfYear.value(date), 1.0);
        assert_eq!(CalendarField::IsMonthStart.value(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()), 1.0);
    }
}
