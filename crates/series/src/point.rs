//! Series Points and Datasets

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cadence::Cadence;
use crate::error::SeriesError;
use crate::validator::Validator;

/// One reported period of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// First day of the period
    pub period_start: NaiveDate,
    /// Reported metric (sales), never negative
    pub target_value: f64,
    /// Auxiliary per-period metrics (buyers, ad spend, promotion flags, ...)
    #[serde(default)]
    pub covariates: BTreeMap<String, f64>,
}

impl TimeSeriesPoint {
    /// Create a point without covariates
    pub fn new(period_start: NaiveDate, target_value: f64) -> Self {
        Self {
            period_start,
            target_value,
            covariates: BTreeMap::new(),
        }
    }

    /// Attach a covariate value
    pub fn with_covariate(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.insert(name.into(), value);
        self
    }
}

/// Immutable, validated, chronologically ordered series snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeSeriesPoint>", into = "Vec<TimeSeriesPoint>")]
pub struct Dataset {
    points: Vec<TimeSeriesPoint>,
}

impl Dataset {
    /// Validate and wrap a list of points
    pub fn new(points: Vec<TimeSeriesPoint>) -> Result<Self, SeriesError> {
        Validator::default().validate(&points)?;
        Ok(Self { points })
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no periods
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in chronological order
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Most recent point
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Target values in chronological order
    pub fn targets(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.target_value).collect()
    }

    /// Period start dates in chronological order
    pub fn period_starts(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.period_start).collect()
    }

    /// Sorted union of covariate names carried by any period
    pub fn covariate_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .points
            .iter()
            .flat_map(|p| p.covariates.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    /// Whether at least one period carries the covariate
    pub fn has_covariate(&self, name: &str) -> bool {
        self.points.iter().any(|p| p.covariates.contains_key(name))
    }

    /// Column of a covariate; periods that do not report it are `None`
    pub fn covariate_column(&self, name: &str) -> Vec<Option<f64>> {
        self.points
            .iter()
            .map(|p| p.covariates.get(name).copied())
            .collect()
    }

    /// Contiguous sub-series; ordering is inherited so no re-validation is needed
    pub fn slice(&self, range: Range<usize>) -> Dataset {
        Dataset {
            points: self.points[range].to_vec(),
        }
    }

    /// Distance between consecutive periods
    pub fn cadence(&self) -> Cadence {
        Cadence::infer(&self.points)
    }
}

impl TryFrom<Vec<TimeSeriesPoint>> for Dataset {
    type Error = SeriesError;

    fn try_from(points: Vec<TimeSeriesPoint>) -> Result<Self, Self::Error> {
        Dataset::new(points)
    }
}

impl From<Dataset> for Vec<TimeSeriesPoint> {
    fn from(dataset: Dataset) -> Self {
        dataset.points
    }
}
