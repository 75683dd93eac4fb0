//! Engine Configuration
//!
//! One flat document covering every stage. Values come from serde defaults,
//! an optional TOML/JSON/YAML file and `SALES_FORECAST__*` environment
//! variables, in that order of precedence (last wins).

use std::path::Path;

use boosting::BoostingConfig;
use config::{Config, Environment, File};
use evaluator::{CvStrategy, EvaluatorConfig};
use feature_engine::{FeatureConfig, InteractionPair, MarketingColumns};
use forecaster::{Aggregation, ForecastConfig};
use reporter::ReliabilityThresholds;
use serde::{Deserialize, Serialize};
use series::{Splitter, DEFAULT_SPLIT_FRACTION};
use tracing::info;

use crate::error::{EngineError, STAGE_CONFIG};

/// Environment variable prefix; nested keys use `__` as separator
pub const ENV_PREFIX: &str = "SALES_FORECAST";

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Leading share of periods used for training during evaluation
    pub split_fraction: f64,
    pub lag_orders: Vec<usize>,
    pub rolling_windows: Vec<usize>,
    pub rolling_std_window: usize,
    pub cv_folds: usize,
    pub cv_strategy: CvStrategy,
    pub forecast_horizon: usize,
    pub hyperparameters: BoostingConfig,
    pub recursive_forecast: bool,
    pub trailing_window: usize,
    pub period_days: Option<i64>,
    pub interval_confidence: f64,
    pub marketing: MarketingColumns,
    pub interactions: Option<Vec<InteractionPair>>,
    pub aggregation: Aggregation,
    pub reliability: ReliabilityThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let features = FeatureConfig::default();
        let evaluator = EvaluatorConfig::default();
        let forecast = ForecastConfig::default();
        Self {
            split_fraction: DEFAULT_SPLIT_FRACTION,
            lag_orders: features.lag_orders,
            rolling_windows: features.rolling_windows,
            rolling_std_window: features.rolling_std_window,
            cv_folds: evaluator.cv_folds,
            cv_strategy: evaluator.cv_strategy,
            forecast_horizon: forecast.horizon,
            hyperparameters: BoostingConfig::default(),
            recursive_forecast: forecast.recursive,
            trailing_window: forecast.trailing_window,
            period_days: forecast.period_days,
            interval_confidence: forecast.interval_confidence,
            marketing: features.marketing,
            interactions: features.interactions,
            aggregation: Aggregation::default(),
            reliability: ReliabilityThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load defaults, then `path` (if any), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("lag_orders")
                    .with_list_parse_key("rolling_windows"),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject any setting a stage would refuse, before training starts
    pub fn validate(&self) -> Result<(), EngineError> {
        Splitter::new(self.split_fraction)?;
        self.features()
            .validate()
            .map_err(|e| EngineError::from_feature(STAGE_CONFIG, e))?;
        self.hyperparameters
            .validate()
            .map_err(|e| EngineError::from_boosting(STAGE_CONFIG, e))?;
        self.evaluator()
            .validate()
            .map_err(|e| EngineError::invalid(STAGE_CONFIG, e.to_string()))?;
        self.forecast()
            .validate()
            .map_err(|e| EngineError::invalid(STAGE_CONFIG, e.to_string()))?;

        let t = &self.reliability;
        if !(t.high >= t.moderate && t.moderate >= t.limited) {
            return Err(EngineError::invalid(
                STAGE_CONFIG,
                format!(
                    "reliability thresholds must descend, got {} / {} / {}",
                    t.high, t.moderate, t.limited
                ),
            ));
        }
        Ok(())
    }

    /// Feature engineering settings
    pub fn features(&self) -> FeatureConfig {
        FeatureConfig {
            lag_orders: self.lag_orders.clone(),
            rolling_windows: self.rolling_windows.clone(),
            rolling_std_window: self.rolling_std_window,
            marketing: self.marketing.clone(),
            interactions: self.interactions.clone(),
        }
    }

    /// Cross-validation settings
    pub fn evaluator(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            cv_folds: self.cv_folds,
            cv_strategy: self.cv_strategy,
        }
    }

    /// Forecast settings
    pub fn forecast(&self) -> ForecastConfig {
        ForecastConfig {
            horizon: self.forecast_horizon,
            recursive: self.recursive_forecast,
            trailing_window: self.trailing_window,
            period_days: self.period_days,
            interval_confidence: self.interval_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.split_fraction, 0.8);
        assert_eq!(config.lag_orders, vec![1, 2, 3]);
        assert_eq!(config.rolling_windows, vec![3, 4]);
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.forecast_horizon, 26);
        assert!(!config.recursive_forecast);
        assert_eq!(config.aggregation, Aggregation::Month);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stage_configs_follow_flat_fields() {
        let config = EngineConfig {
            forecast_horizon: 8,
            recursive_forecast: true,
            cv_folds: 3,
            lag_orders: vec![1, 4],
            ..Default::default()
        };
        assert_eq!(config.forecast().horizon, 8);
        assert!(config.forecast().recursive);
        assert_eq!(config.evaluator().cv_folds, 3);
        assert_eq!(config.features().lag_orders, vec![1, 4]);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let cases = [
            EngineConfig {
                split_fraction: 1.0,
                ..Default::default()
            },
            EngineConfig {
                lag_orders: vec![],
                ..Default::default()
            },
            EngineConfig {
                cv_folds: 1,
                ..Default::default()
            },
            EngineConfig {
                forecast_horizon: 0,
                ..Default::default()
            },
            EngineConfig {
                hyperparameters: BoostingConfig {
                    tree_count: 0,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(EngineError::InvalidInput { .. })),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("sales-forecast-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "forecast_horizon = 12\nrecursive_forecast = true\naggregation = \"quarter\"\n\n[hyperparameters]\ntree_count = 80"
        )
        .unwrap();
        drop(file);

        let config = EngineConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.forecast_horizon, 12);
        assert!(config.recursive_forecast);
        assert_eq!(config.aggregation, Aggregation::Quarter);
        assert_eq!(config.hyperparameters.tree_count, 80);
        assert_eq!(config.hyperparameters.max_depth, 6);
        assert_eq!(config.cv_folds, 5);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("sales-forecast-missing-config.toml");
        assert!(matches!(EngineConfig::load(Some(&path)), Err(EngineError::Config(_))));
    }
}
