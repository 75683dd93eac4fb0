//! Multi-period Forecasting
//!
//! The production model is retrained on the full history. Future rows get
//! calendar features from their real dates and target-derived features seeded
//! from the history; in flat mode those seeds stay fixed, in recursive mode
//! each prediction is appended to the history before the next period.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use feature_engine::{FeatureEngineer, SeriesFrame};
use serde::{Deserialize, Serialize};
use series::{Cadence, Dataset};
use tracing::{debug, info};
use trainer::{Model, Trainer};

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::interval::{IntervalEstimator, PredictionInterval};
use crate::scenario::{trailing_means, Scenario};

/// Forecast of one future period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based distance from the last historical period
    pub step: usize,
    pub period_start: NaiveDate,
    /// Predicted target, never negative
    pub predicted_value: f64,
    /// Present when a residual scale was supplied
    pub interval: Option<PredictionInterval>,
}

/// Whether lag features follow the predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMode {
    Flat,
    Recursive,
}

/// Retrained model and its projection
#[derive(Debug, Clone)]
pub struct Forecast {
    pub model: Model,
    pub points: Vec<ForecastPoint>,
    pub mode: ForecastMode,
    pub cadence: Cadence,
}

/// Produces forecasts beyond the end of a series
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    trainer: Trainer,
}

impl Forecaster {
    pub fn new(config: ForecastConfig, trainer: Trainer) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config, trainer })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Retrain on the whole dataset and project `horizon` periods
    pub fn forecast(
        &self,
        engineer: &FeatureEngineer,
        dataset: &Dataset,
        scenario: &Scenario,
        residual_scale: Option<f64>,
    ) -> Result<Forecast, ForecastError> {
        let model = self.retrain(engineer, dataset)?;
        let points = self.project(&model, dataset, scenario, residual_scale)?;
        Ok(Forecast {
            model,
            points,
            mode: self.mode(),
            cadence: self.cadence(dataset)?,
        })
    }

    /// Fresh model fitted on every period of the dataset
    pub fn retrain(&self, engineer: &FeatureEngineer, dataset: &Dataset) -> Result<Model, ForecastError> {
        if dataset.is_empty() {
            return Err(ForecastError::EmptyHistory);
        }
        let vectors = engineer.transform(dataset);
        let model = self.trainer.fit(engineer.spec(), &vectors, &dataset.targets())?;
        Ok(model)
    }

    /// Project the periods following `dataset` with an already fitted model
    pub fn project(
        &self,
        model: &Model,
        dataset: &Dataset,
        scenario: &Scenario,
        residual_scale: Option<f64>,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let origin = dataset.last().ok_or(ForecastError::EmptyHistory)?.period_start;
        let horizon = self.config.horizon;
        let cadence = self.cadence(dataset)?;

        scenario.validate(&model.spec().source_covariates(), horizon)?;
        let intervals = residual_scale
            .map(|scale| IntervalEstimator::new(self.config.interval_confidence, scale))
            .transpose()?;

        let baseline = trailing_means(dataset, self.config.trailing_window);
        let engineer = FeatureEngineer::new(model.spec().clone());
        let mut frame = SeriesFrame::from_dataset(dataset);

        info!(
            "Forecasting {} periods from {} ({:?}, every {} days{})",
            horizon,
            origin,
            self.mode(),
            cadence.days(),
            if scenario.is_empty() { "" } else { ", scenario overrides" }
        );

        let mut points = Vec::with_capacity(horizon);
        for step in 1..=horizon {
            let period_start = cadence.advance(origin, step)?;
            let covariates: BTreeMap<String, f64> = scenario.covariates_for(step, &baseline);

            let vector = engineer.synthesize(&frame, period_start, &covariates)?;
            let raw = model.predict_one(&vector)?;
            if raw < 0.0 {
                debug!("Step {}: negative raw prediction {:.2} clamped to 0", step, raw);
            }
            let predicted_value = raw.max(0.0);
            let interval = intervals.as_ref().map(|estimator| estimator.bounds(predicted_value, step));

            if self.config.recursive {
                frame.push(period_start, predicted_value, &covariates);
            }

            points.push(ForecastPoint {
                step,
                period_start,
                predicted_value,
                interval,
            });
        }

        let total: f64 = points.iter().map(|p| p.predicted_value).sum();
        info!("Forecast total over {} periods: {:.2}", points.len(), total);
        Ok(points)
    }

    fn mode(&self) -> ForecastMode {
        if self.config.recursive {
            ForecastMode::Recursive
        } else {
            ForecastMode::Flat
        }
    }

    fn cadence(&self, dataset: &Dataset) -> Result<Cadence, ForecastError> {
        match self.config.period_days {
            Some(days) => Ok(Cadence::from_days(days)?),
            None => Ok(dataset.cadence()),
        }
    }
}
