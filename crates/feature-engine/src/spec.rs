//! Feature Specification
//!
//! A feature spec is the ordered feature contract shared by training, evaluation
//! and forecasting. It is derived once from the dataset's covariate columns
//! and the feature configuration, then carried by the fitted model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use series::Dataset;
use tracing::{debug, info, warn};

use crate::calendar::CalendarField;
use crate::config::{FeatureConfig, InteractionPair};
use crate::error::FeatureError;

/// Window used by the marketing rolling features
pub const MARKETING_WINDOW: usize = 3;

/// Family a feature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    Calendar,
    Covariate,
    Lag,
    Rolling,
    Trend,
    Interaction,
    Marketing,
}

/// How a feature value is computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Attribute of the period start date
    Calendar { field: CalendarField },
    /// Raw covariate of the current period
    Covariate { column: String },
    /// Target value `lag` periods back
    TargetLag { lag: usize },
    /// Trailing mean of the target, current period included
    TargetRollingMean { window: usize },
    /// Trailing sample standard deviation of the target
    TargetRollingStd { window: usize },
    /// `target[i] - target[i - order]`
    TargetDiff { order: usize },
    /// `numerator / (denominator + 1)` of the current period
    CovariateRatio { numerator: String, denominator: String },
    /// Covariate value `lag` periods back
    CovariateLag { column: String, lag: usize },
    /// Trailing mean of the observed covariate values
    CovariateRollingMean { column: String, window: usize },
    /// Trailing sum of the observed covariate values
    CovariateRollingSum { column: String, window: usize },
    /// `target / (covariate + 1)`
    TargetPerCovariate { column: String },
}

impl FeatureKind {
    /// Covariate columns read by this feature
    pub fn columns(&self) -> Vec<&str> {
        match self {
            FeatureKind::Covariate { column }
            | FeatureKind::CovariateLag { column, .. }
            | FeatureKind::CovariateRollingMean { column, .. }
            | FeatureKind::CovariateRollingSum { column, .. }
            | FeatureKind::TargetPerCovariate { column } => vec![column.as_str()],
            FeatureKind::CovariateRatio {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
            _ => Vec::new(),
        }
    }
}

/// One named feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDef {
    pub name: String,
    pub group: FeatureGroup,
    pub kind: FeatureKind,
}

/// Ordered, immutable feature contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    features: Vec<FeatureDef>,
}

impl FeatureSpec {
    /// Derive the feature list for a dataset
    pub fn derive(dataset: &Dataset, config: &FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;

        let covariates = dataset.covariate_names();
        let mut builder = SpecBuilder::default();

        for field in CalendarField::ALL {
            builder.push(field.as_str().to_string(), FeatureGroup::Calendar, FeatureKind::Calendar { field });
        }

        for column in &covariates {
            builder.push(
                format!("cov_{}", column),
                FeatureGroup::Covariate,
                FeatureKind::Covariate {
                    column: column.clone(),
                },
            );
        }

        for lag in config.normalized_lags() {
            builder.push(format!("target_lag_{}", lag), FeatureGroup::Lag, FeatureKind::TargetLag { lag });
        }

        for window in config.normalized_windows() {
            builder.push(
                format!("target_rolling_mean_{}", window),
                FeatureGroup::Rolling,
                FeatureKind::TargetRollingMean { window },
            );
        }
        builder.push(
            format!("target_rolling_std_{}", config.rolling_std_window),
            FeatureGroup::Rolling,
            FeatureKind::TargetRollingStd {
                window: config.rolling_std_window,
            },
        );

        for order in [1, 2] {
            builder.push(format!("target_diff_{}", order), FeatureGroup::Trend, FeatureKind::TargetDiff { order });
        }

        for pair in interaction_pairs(dataset, config) {
            builder.push(
                format!("ratio_{}_per_{}", pair.numerator, pair.denominator),
                FeatureGroup::Interaction,
                FeatureKind::CovariateRatio {
                    numerator: pair.numerator,
                    denominator: pair.denominator,
                },
            );
        }

        let marketing = &config.marketing;
        if dataset.has_covariate(&marketing.spend) {
            let column = marketing.spend.clone();
            builder.push(
                format!("{}_lag_1", column),
                FeatureGroup::Marketing,
                FeatureKind::CovariateLag { column: column.clone(), lag: 1 },
            );
            builder.push(
                format!("{}_rolling_mean_{}", column, MARKETING_WINDOW),
                FeatureGroup::Marketing,
                FeatureKind::CovariateRollingMean {
                    column: column.clone(),
                    window: MARKETING_WINDOW,
                },
            );
            builder.push(
                format!("sales_per_{}", column),
                FeatureGroup::Marketing,
                FeatureKind::TargetPerCovariate { column },
            );
        }
        if dataset.has_covariate(&marketing.promotion) {
            let column = marketing.promotion.clone();
            builder.push(
                format!("{}_lag_1", column),
                FeatureGroup::Marketing,
                FeatureKind::CovariateLag { column: column.clone(), lag: 1 },
            );
            builder.push(
                format!("{}_streak_{}", column, MARKETING_WINDOW),
                FeatureGroup::Marketing,
                FeatureKind::CovariateRollingSum {
                    column,
                    window: MARKETING_WINDOW,
                },
            );
        }
        if dataset.has_covariate(&marketing.promotion_cost) {
            let column = marketing.promotion_cost.clone();
            builder.push(
                format!("sales_per_{}", column),
                FeatureGroup::Marketing,
                FeatureKind::TargetPerCovariate { column },
            );
        }

        let spec = builder.finish()?;
        info!(
            "Derived feature spec: {} features ({} marketing)",
            spec.len(),
            spec.count_group(FeatureGroup::Marketing)
        );
        Ok(spec)
    }

    /// Build a spec from explicit definitions
    pub fn from_defs(features: Vec<FeatureDef>) -> Result<Self, FeatureError> {
        let mut builder = SpecBuilder::default();
        for def in features {
            builder.push(def.name, def.group, def.kind);
        }
        builder.finish()
    }

    /// Feature definitions in order
    pub fn features(&self) -> &[FeatureDef] {
        &self.features
    }

    /// Feature names in order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the feature spec declares no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Position of a feature
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    /// Number of features in a group
    pub fn count_group(&self, group: FeatureGroup) -> usize {
        self.features.iter().filter(|f| f.group == group).count()
    }

    /// Covariate columns the feature spec reads
    pub fn source_covariates(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .flat_map(|f| f.kind.columns())
            .map(|c| c.to_string())
            .collect()
    }

    /// Fail unless `requested` declares exactly these features in this order
    pub fn ensure_matches(&self, requested: &FeatureSpec) -> Result<(), FeatureError> {
        if self.names() == requested.names() {
            return Ok(());
        }

        let declared: BTreeSet<&str> = self.names().into_iter().collect();
        let asked: BTreeSet<&str> = requested.names().into_iter().collect();

        let mut missing: Vec<String> = declared.difference(&asked).map(|s| s.to_string()).collect();
        let mut unexpected: Vec<String> = asked.difference(&declared).map(|s| s.to_string()).collect();

        if missing.is_empty() && unexpected.is_empty() {
            // Same names, different order
            if let Some((pos, (expected, actual))) = self
                .names()
                .into_iter()
                .zip(requested.names())
                .enumerate()
                .find(|(_, (a, b))| a != b)
            {
                missing.push(format!("{} at position {}", expected, pos));
                unexpected.push(format!("{} at position {}", actual, pos));
            }
        }

        warn!(
            "Feature spec mismatch: {} missing, {} unexpected",
            missing.len(),
            unexpected.len()
        );
        Err(FeatureError::FeatureMismatch { missing, unexpected })
    }
}

#[derive(Default)]
struct SpecBuilder {
    features: Vec<FeatureDef>,
}

impl SpecBuilder {
    fn push(&mut self, name: String, group: FeatureGroup, kind: FeatureKind) {
        self.features.push(FeatureDef { name, group, kind });
    }

    fn finish(self) -> Result<FeatureSpec, FeatureError> {
        let mut seen = BTreeSet::new();
        for def in &self.features {
            if !seen.insert(def.name.as_str()) {
                return Err(FeatureError::InvalidConfig(format!(
                    "duplicate feature name '{}'",
                    def.name
                )));
            }
        }
        Ok(FeatureSpec {
            features: self.features,
        })
    }
}

/// Configured ratios restricted to present columns, or every pair of
/// non-marketing covariates when none are configured
fn interaction_pairs(dataset: &Dataset, config: &FeatureConfig) -> Vec<InteractionPair> {
    match &config.interactions {
        Some(pairs) => pairs
            .iter()
            .filter(|pair| {
                let present = dataset.has_covariate(&pair.numerator) && dataset.has_covariate(&pair.denominator);
                if !present {
                    warn!(
                        "Skipping interaction {}/{}: column not in dataset",
                        pair.numerator, pair.denominator
                    );
                }
                present
            })
            .cloned()
            .collect(),
        None => {
            let columns: Vec<String> = dataset
                .covariate_names()
                .into_iter()
                .filter(|c| !config.marketing.contains(c))
                .collect();
            let mut pairs = Vec::new();
            for (i, numerator) in columns.iter().enumerate() {
                for denominator in &columns[i + 1..] {
                    pairs.push(InteractionPair::new(numerator.clone(), denominator.clone()));
                }
            }
            debug!("Default interactions: {} pairs from {} covariates", pairs.len(), columns.len());
            pairs
        }
    }
}
