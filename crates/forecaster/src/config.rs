//! Forecast configuration

use serde::{Deserialize, Serialize};
use series::MAX_PERIOD_DAYS;

use crate::error::ForecastError;

/// Forecast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future periods (default: 26)
    pub horizon: usize,
    /// Feed each prediction back as history for the next period
    pub recursive: bool,
    /// Periods averaged for default future covariates (default: 4)
    pub trailing_window: usize,
    /// Fixed period length in days; inferred from the series when absent
    pub period_days: Option<i64>,
    /// Two-sided coverage of prediction intervals (default: 0.95)
    pub interval_confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 26,
            recursive: false,
            trailing_window: 4,
            period_days: None,
            interval_confidence: 0.95,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidConfig("horizon must be positive".into()));
        }
        if self.trailing_window == 0 {
            return Err(ForecastError::InvalidConfig("trailing_window must be positive".into()));
        }
        if let Some(days) = self.period_days {
            if !(1..=MAX_PERIOD_DAYS).contains(&days) {
                return Err(ForecastError::InvalidConfig(format!(
                    "period_days must be within 1..={}, got {}",
                    MAX_PERIOD_DAYS, days
                )));
            }
        }
        if !(self.interval_confidence > 0.0 && self.interval_confidence < 1.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "interval_confidence must be in (0, 1), got {}",
                self.interval_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert_eq!(config.horizon, 26);
        assert!(!config.recursive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        for config in [
            ForecastConfig { horizon: 0, ..Default::default() },
            ForecastConfig { trailing_window: 0, ..Default::default() },
            ForecastConfig { period_days: Some(0), ..Default::default() },
            ForecastConfig { period_days: Some(10_000_000), ..Default::default() },
            ForecastConfig { interval_confidence: 1.0, ..Default::default() },
        ] {
            assert!(matches!(config.validate(), Err(ForecastError::InvalidConfig(_))));
        }
    }
}
