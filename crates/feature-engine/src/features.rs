//! Feature Vector Assembly

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series::Dataset;
use tracing::debug;

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::frame::SeriesFrame;
use crate::spec::{FeatureKind, FeatureSpec};
use crate::statistics::{trailing, WindowStats};

/// Feature values for one period, in spec order; `None` marks a missing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Period the features describe
    pub period_start: NaiveDate,
    /// Feature values aligned with the feature spec
    pub values: Vec<Option<f64>>,
}

impl FeatureVector {
    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a feature position
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Number of missing values
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Source of the current period's covariates
enum Current<'a> {
    /// Read from the frame at the row index
    Frame,
    /// Supplied for a period beyond the frame
    Supplied(&'a BTreeMap<String, f64>),
}

/// Everything needed to evaluate one row
struct RowContext<'a> {
    frame: &'a SeriesFrame,
    date: NaiveDate,
    /// Position of the row; equals `frame.len()` for a synthesized row
    index: usize,
    /// Last period whose target is known
    anchor: usize,
    current: Current<'a>,
}

impl RowContext<'_> {
    fn covariate(&self, name: &str) -> Option<f64> {
        match self.current {
            Current::Frame => self.frame.covariate(name, self.index),
            Current::Supplied(values) => values.get(name).copied(),
        }
    }

    fn anchor_target(&self) -> f64 {
        self.frame.targets()[self.anchor]
    }

    fn evaluate(&self, kind: &FeatureKind) -> Option<f64> {
        let targets = self.frame.targets();
        match kind {
            FeatureKind::Calendar { field } => Some(field.value(self.date)),
            FeatureKind::Covariate { column } => self.covariate(column),
            FeatureKind::TargetLag { lag } => self.index.checked_sub(*lag).map(|j| targets[j]),
            FeatureKind::TargetRollingMean { window } => {
                WindowStats::compute(trailing(targets, self.anchor, *window)).map(|s| s.mean)
            }
            FeatureKind::TargetRollingStd { window } => {
                WindowStats::compute(trailing(targets, self.anchor, *window)).and_then(|s| s.std_dev)
            }
            FeatureKind::TargetDiff { order } => self
                .anchor
                .checked_sub(*order)
                .map(|j| self.anchor_target() - targets[j]),
            FeatureKind::CovariateRatio {
                numerator,
                denominator,
            } => {
                let a = self.covariate(numerator)?;
                let b = self.covariate(denominator)?;
                Some(a / (b + 1.0))
            }
            FeatureKind::CovariateLag { column, lag } => self
                .index
                .checked_sub(*lag)
                .and_then(|j| self.frame.covariate(column, j)),
            FeatureKind::CovariateRollingMean { column, window } => self
                .frame
                .column(column)
                .and_then(|c| WindowStats::compute_observed(trailing(c, self.anchor, *window)))
                .map(|s| s.mean),
            FeatureKind::CovariateRollingSum { column, window } => self
                .frame
                .column(column)
                .and_then(|c| WindowStats::compute_observed(trailing(c, self.anchor, *window)))
                .map(|s| s.sum),
            FeatureKind::TargetPerCovariate { column } => {
                let value = self.covariate(column)?;
                Some(self.anchor_target() / (value + 1.0))
            }
        }
    }
}

/// Computes feature vectors for a fixed spec
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    spec: FeatureSpec,
}

impl FeatureEngineer {
    /// Create an engineer for an existing spec
    pub fn new(spec: FeatureSpec) -> Self {
        Self { spec }
    }

    /// Derive the feature spec from a dataset
    pub fn fit(dataset: &Dataset, config: &FeatureConfig) -> Result<Self, FeatureError> {
        Ok(Self::new(FeatureSpec::derive(dataset, config)?))
    }

    /// The feature spec every vector follows
    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// Consume the engineer, keeping the feature spec
    pub fn into_spec(self) -> FeatureSpec {
        self.spec
    }

    /// One vector per dataset period, in period order
    pub fn transform(&self, dataset: &Dataset) -> Vec<FeatureVector> {
        let frame = SeriesFrame::from_dataset(dataset);
        let vectors = self.transform_frame(&frame);
        debug!(
            "Transformed {} periods into {}-wide feature vectors",
            vectors.len(),
            self.spec.len()
        );
        vectors
    }

    /// One vector per frame period
    pub fn transform_frame(&self, frame: &SeriesFrame) -> Vec<FeatureVector> {
        (0..frame.len()).filter_map(|i| self.row(frame, i)).collect()
    }

    /// Vector of an in-frame period
    pub fn row(&self, frame: &SeriesFrame, index: usize) -> Option<FeatureVector> {
        let date = *frame.dates().get(index)?;
        let context = RowContext {
            frame,
            date,
            index,
            anchor: index,
            current: Current::Frame,
        };
        Some(self.assemble(&context))
    }

    /// Vector of the period immediately following the frame
    ///
    /// Target-derived features are seeded from the frame's trailing values;
    /// raw covariates and ratios come from `covariates`.
    pub fn synthesize(
        &self,
        frame: &SeriesFrame,
        date: NaiveDate,
        covariates: &BTreeMap<String, f64>,
    ) -> Result<FeatureVector, FeatureError> {
        if frame.is_empty() {
            return Err(FeatureError::EmptyHistory);
        }

        let context = RowContext {
            frame,
            date,
            index: frame.len(),
            anchor: frame.len() - 1,
            current: Current::Supplied(covariates),
        };
        Ok(self.assemble(&context))
    }

    fn assemble(&self, context: &RowContext<'_>) -> FeatureVector {
        let values = self
            .spec
            .features()
            .iter()
            .map(|def| context.evaluate(&def.kind).filter(|v| v.is_finite()))
            .collect();

        FeatureVector {
            period_start: context.date,
            values,
        }
    }
}
