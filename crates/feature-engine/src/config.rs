//! Feature configuration

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Covariate columns that unlock the marketing feature group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingColumns {
    /// Advertising spend per period
    pub spend: String,
    /// Promotion indicator (0/1) per period
    pub promotion: String,
    /// Promotion (voucher) cost per period
    pub promotion_cost: String,
}

impl Default for MarketingColumns {
    fn default() -> Self {
        Self {
            spend: "ad_spend".to_string(),
            promotion: "has_promotion".to_string(),
            promotion_cost: "promotion_cost".to_string(),
        }
    }
}

impl MarketingColumns {
    /// Whether a covariate is one of the marketing sources
    pub fn contains(&self, name: &str) -> bool {
        name == self.spend || name == self.promotion || name == self.promotion_cost
    }
}

/// Ratio feature `numerator / (denominator + 1)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPair {
    pub numerator: String,
    pub denominator: String,
}

impl InteractionPair {
    pub fn new(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }
}

/// Feature engineering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Target lag offsets (default: 1, 2, 3)
    pub lag_orders: Vec<usize>,
    /// Rolling mean windows (default: 3, 4)
    pub rolling_windows: Vec<usize>,
    /// Rolling standard deviation window (default: 3)
    pub rolling_std_window: usize,
    /// Marketing source columns
    pub marketing: MarketingColumns,
    /// Explicit covariate ratios; `None` pairs every non-marketing covariate
    pub interactions: Option<Vec<InteractionPair>>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lag_orders: vec![1, 2, 3],
            rolling_windows: vec![3, 4],
            rolling_std_window: 3,
            marketing: MarketingColumns::default(),
            interactions: None,
        }
    }
}

impl FeatureConfig {
    /// Reject configurations that would produce undefined features
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.lag_orders.is_empty() || self.lag_orders.contains(&0) {
            return Err(FeatureError::InvalidConfig(format!(
                "lag_orders must be non-empty and positive, got {:?}",
                self.lag_orders
            )));
        }
        if self.rolling_windows.is_empty() || self.rolling_windows.contains(&0) {
            return Err(FeatureError::InvalidConfig(format!(
                "rolling_windows must be non-empty and positive, got {:?}",
                self.rolling_windows
            )));
        }
        if self.rolling_std_window < 2 {
            return Err(FeatureError::InvalidConfig(format!(
                "rolling_std_window must be at least 2, got {}",
                self.rolling_std_window
            )));
        }
        if let Some(pairs) = &self.interactions {
            if let Some(pair) = pairs.iter().find(|p| p.numerator == p.denominator) {
                return Err(FeatureError::InvalidConfig(format!(
                    "interaction pair uses '{}' on both sides",
                    pair.numerator
                )));
            }
        }
        Ok(())
    }

    /// Lag orders sorted and deduplicated
    pub(crate) fn normalized_lags(&self) -> Vec<usize> {
        let mut lags = self.lag_orders.clone();
        lags.sort_unstable();
        lags.dedup();
        lags
    }

    /// Rolling windows sorted and deduplicated
    pub(crate) fn normalized_windows(&self) -> Vec<usize> {
        let mut windows = self.rolling_windows.clone();
        windows.sort_unstable();
        windows.dedup();
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FeatureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_lag_rejected() {
        let config = FeatureConfig {
            lag_orders: vec![0, 1],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_std_window_of_one_rejected() {
        let config = FeatureConfig {
            rolling_std_window: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_self_ratio_rejected() {
        let config = FeatureConfig {
            interactions: Some(vec![InteractionPair::new("buyers", "buyers")]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
