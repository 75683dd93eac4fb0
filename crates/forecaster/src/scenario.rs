//! Scenario Covariates
//!
//! Future covariate values default to a trailing average of the history. A
//! scenario overrides them for every period, for single periods, or both;
//! per-step values win over constant ones.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use series::Dataset;
use tracing::debug;

use crate::error::ForecastError;

/// Caller-supplied future covariate values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Values applied to every forecast period
    pub constant: BTreeMap<String, f64>,
    /// Values for individual periods, keyed by 1-based step
    pub per_step: BTreeMap<usize, BTreeMap<String, f64>>,
}

impl Scenario {
    /// Scenario without overrides
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Override a covariate for every period
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constant.insert(name.into(), value);
        self
    }

    /// Override a covariate for one period
    pub fn with_step(mut self, step: usize, name: impl Into<String>, value: f64) -> Self {
        self.per_step.entry(step).or_default().insert(name.into(), value);
        self
    }

    /// Whether the scenario overrides anything
    pub fn is_empty(&self) -> bool {
        self.constant.is_empty() && self.per_step.values().all(|m| m.is_empty())
    }

    /// Reject unknown names, non-finite values and steps outside the horizon
    pub fn validate(&self, known: &BTreeSet<String>, horizon: usize) -> Result<(), ForecastError> {
        let mut unknown: BTreeSet<String> = BTreeSet::new();

        for (name, value) in &self.constant {
            if !known.contains(name) {
                unknown.insert(name.clone());
            } else if !value.is_finite() {
                return Err(ForecastError::NonFiniteOverride {
                    name: name.clone(),
                    step: None,
                });
            }
        }

        for (&step, values) in &self.per_step {
            if step == 0 || step > horizon {
                return Err(ForecastError::StepOutOfRange { step, horizon });
            }
            for (name, value) in values {
                if !known.contains(name) {
                    unknown.insert(name.clone());
                } else if !value.is_finite() {
                    return Err(ForecastError::NonFiniteOverride {
                        name: name.clone(),
                        step: Some(step),
                    });
                }
            }
        }

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ForecastError::UnknownCovariates {
                names: unknown.into_iter().collect(),
            })
        }
    }

    /// Covariates of one step layered over the baseline
    pub fn covariates_for(&self, step: usize, baseline: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        let mut values = baseline.clone();
        values.extend(self.constant.iter().map(|(k, v)| (k.clone(), *v)));
        if let Some(overrides) = self.per_step.get(&step) {
            values.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
        }
        values
    }
}

/// Mean of each covariate's observed values over the last `window` periods
///
/// Columns with no observation inside the window are left out.
pub fn trailing_means(dataset: &Dataset, window: usize) -> BTreeMap<String, f64> {
    let start = dataset.len().saturating_sub(window);
    let tail = &dataset.points()[start..];

    let mut means = BTreeMap::new();
    for name in dataset.covariate_names() {
        let observed: Vec<f64> = tail.iter().filter_map(|p| p.covariates.get(&name).copied()).collect();
        if observed.is_empty() {
            debug!("No '{}' values in the last {} periods", name, window);
            continue;
        }
        means.insert(name, observed.iter().sum::<f64>() / observed.len() as f64);
    }
    means
}
