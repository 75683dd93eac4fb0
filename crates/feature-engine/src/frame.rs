//! Columnar view of a series that can be extended with synthesized periods

use std::collections::BTreeMap;

use chrono::NaiveDate;
use series::Dataset;

/// Columnar history used for feature computation
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    dates: Vec<NaiveDate>,
    targets: Vec<f64>,
    covariates: BTreeMap<String, Vec<Option<f64>>>,
}

impl SeriesFrame {
    /// Build a frame holding every covariate column of the dataset
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let covariates = dataset
            .covariate_names()
            .into_iter()
            .map(|name| {
                let column = dataset.covariate_column(&name);
                (name, column)
            })
            .collect();

        Self {
            dates: dataset.period_starts(),
            targets: dataset.targets(),
            covariates,
        }
    }

    /// Append a period; covariates outside the frame's columns are ignored
    pub fn push(&mut self, date: NaiveDate, target: f64, covariates: &BTreeMap<String, f64>) {
        self.dates.push(date);
        self.targets.push(target);
        for (name, column) in self.covariates.iter_mut() {
            column.push(covariates.get(name).copied());
        }
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the frame holds no periods
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Period start dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Target values
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Column of a covariate, if the frame carries it
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.covariates.get(name).map(|c| c.as_slice())
    }

    /// Value of a covariate at a period
    pub fn covariate(&self, name: &str, index: usize) -> Option<f64> {
        self.column(name).and_then(|c| c.get(index).copied().flatten())
    }

    /// Names of the covariate columns
    pub fn covariate_names(&self) -> impl Iterator<Item = &str> {
        self.covariates.keys().map(|k| k.as_str())
    }
}
