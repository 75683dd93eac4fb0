//! Forecast Sessions
//!
//! A session owns one validated dataset and a feature spec fitted to it.
//! `run` chains the whole pipeline: hold-out evaluation, retraining on the
//! full history, projection, aggregation and reporting.

use chrono::NaiveDate;
use evaluator::{EvaluationOutcome, Evaluator};
use feature_engine::{FeatureEngineer, FeatureSpec};
use forecaster::{aggregate, Aggregation, Forecast, ForecastMode, ForecastPoint, Forecaster, PeriodTotal, Scenario};
use reporter::{group_importance, rank_features, FeatureImportance, ForecastSummary, GroupImportance, Reliability};
use serde::{Deserialize, Serialize};
use series::{Dataset, Splitter, TimeSeriesPoint};
use tracing::{info, warn};
use trainer::Trainer;

use crate::config::EngineConfig;
use crate::error::{EngineError, STAGE_FEATURES};

/// Span of the history a report was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySpan {
    pub periods: usize,
    pub first_period: NaiveDate,
    pub last_period: NaiveDate,
    pub cadence_days: i64,
}

/// Everything one session run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub history: HistorySpan,
    pub evaluation: EvaluationOutcome,
    pub mode: ForecastMode,
    pub forecast: Vec<ForecastPoint>,
    pub aggregation: Aggregation,
    pub period_totals: Vec<PeriodTotal>,
    pub summary: Option<ForecastSummary>,
    pub feature_importance: Vec<FeatureImportance>,
    pub group_importance: Vec<GroupImportance>,
    pub reliability: Reliability,
    pub guidance: String,
}

/// Forecasting session over one dataset
#[derive(Debug, Clone)]
pub struct ForecastSession {
    config: EngineConfig,
    dataset: Dataset,
    engineer: FeatureEngineer,
    trainer: Trainer,
    first_period: NaiveDate,
    last_period: NaiveDate,
}

impl ForecastSession {
    /// Validate `points` and fit the feature spec
    pub fn new(config: EngineConfig, points: Vec<TimeSeriesPoint>) -> Result<Self, EngineError> {
        let dataset = Dataset::new(points)?;
        Self::from_dataset(config, dataset)
    }

    /// Session over an already validated dataset
    pub fn from_dataset(config: EngineConfig, dataset: Dataset) -> Result<Self, EngineError> {
        config.validate()?;
        let (first_period, last_period) = match (dataset.points().first(), dataset.last()) {
            (Some(first), Some(last)) => (first.period_start, last.period_start),
            _ => {
                return Err(EngineError::InsufficientData {
                    stage: STAGE_FEATURES,
                    required: 1,
                    actual: 0,
                })
            }
        };

        let engineer = FeatureEngineer::fit(&dataset, &config.features())?;
        let trainer = Trainer::new(config.hyperparameters.clone())?;
        info!(
            "Session ready: {} periods, {} features",
            dataset.len(),
            engineer.spec().len()
        );

        Ok(Self {
            config,
            dataset,
            engineer,
            trainer,
            first_period,
            last_period,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Feature layout shared by every model of the session
    pub fn spec(&self) -> &FeatureSpec {
        self.engineer.spec()
    }

    /// Hold-out evaluation on the chronological split
    pub fn evaluate(&self) -> Result<EvaluationOutcome, EngineError> {
        let splitter = Splitter::new(self.config.split_fraction)?;
        let evaluator = Evaluator::new(self.config.evaluator(), self.trainer.clone())?;
        Ok(evaluator.evaluate(&self.engineer, &self.dataset, &splitter)?)
    }

    /// Retrain on the full history and project the configured horizon
    ///
    /// `residual_scale` turns on prediction intervals.
    pub fn forecast(&self, scenario: &Scenario, residual_scale: Option<f64>) -> Result<Forecast, EngineError> {
        let forecaster = Forecaster::new(self.config.forecast(), self.trainer.clone())?;
        Ok(forecaster.forecast(&self.engineer, &self.dataset, scenario, residual_scale)?)
    }

    /// Evaluate, forecast and report
    ///
    /// Interval width follows the hold-out RMSE; without a computed
    /// evaluation no intervals are attached.
    pub fn run(&self, scenario: &Scenario) -> Result<SessionReport, EngineError> {
        let evaluation = self.evaluate()?;
        let residual_scale = evaluation.report().map(|r| r.test.rmse);
        let accuracy = evaluation.report().and_then(|r| r.accuracy());
        if residual_scale.is_none() {
            warn!("No hold-out evaluation; forecast carries no intervals");
        }

        let forecast = self.forecast(scenario, residual_scale)?;
        let period_totals = aggregate(&forecast.points, self.config.aggregation);
        let summary = ForecastSummary::from_points(&forecast.points, &self.dataset);
        let feature_importance = rank_features(&forecast.model);
        let group_importance = group_importance(&feature_importance);
        let reliability = Reliability::from_accuracy(accuracy, &self.config.reliability);

        info!(
            "Session complete: {} forecast periods, reliability {}",
            forecast.points.len(),
            reliability.as_str()
        );

        Ok(SessionReport {
            history: self.history_span(&forecast),
            evaluation,
            mode: forecast.mode,
            aggregation: self.config.aggregation,
            period_totals,
            summary,
            feature_importance,
            group_importance,
            reliability,
            guidance: reliability.guidance().to_string(),
            forecast: forecast.points,
        })
    }

    fn history_span(&self, forecast: &Forecast) -> HistorySpan {
        HistorySpan {
            periods: self.dataset.len(),
            first_period: self.first_period,
            last_period: self.last_period,
            cadence_days: forecast.cadence.days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boosting::BoostingConfig;

    fn week(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::weeks(i)
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            hyperparameters: BoostingConfig {
                tree_count: 40,
                ..Default::default()
            },
            forecast_horizon: 8,
            ..Default::default()
        }
    }

    fn points(n: usize) -> Vec<TimeSeriesPoint> {
        (0..n)
            .map(|i| {
                TimeSeriesPoint::new(week(i as i64), 2_000.0 + 15.0 * i as f64 + (i % 3) as f64 * 40.0)
                    .with_covariate("buyers", 100.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_run_produces_full_report() {
        let session = ForecastSession::new(fast_config(), points(30)).unwrap();
        let report = session.run(&Scenario::baseline()).unwrap();

        assert!(report.evaluation.is_computed());
        assert_eq!(report.forecast.len(), 8);
        assert_eq!(report.history.periods, 30);
        assert_eq!(report.history.cadence_days, 7);
        assert_eq!(report.forecast[0].period_start, week(30));
        assert!(report.forecast.iter().all(|p| p.interval.is_some()));
        assert_eq!(
            report.period_totals.iter().map(|t| t.periods).sum::<usize>(),
            8
        );
        assert_eq!(report.feature_importance.len(), session.spec().len());
        assert!(report.summary.is_some());
        assert_ne!(report.reliability, Reliability::Unknown);
    }

    #[test]
    fn test_short_history_skips_evaluation() {
        let session = ForecastSession::new(fast_config(), points(4)).unwrap();
        let report = session.run(&Scenario::baseline()).unwrap();

        assert!(!report.evaluation.is_computed());
        assert_eq!(report.reliability, Reliability::Unknown);
        assert_eq!(report.forecast.len(), 8);
        assert!(report.forecast.iter().all(|p| p.interval.is_none()));
    }

    #[test]
    fn test_empty_history_rejected() {
        assert!(matches!(
            ForecastSession::new(fast_config(), Vec::new()),
            Err(EngineError::InsufficientData { actual: 0, .. })
        ));
    }

    #[test]
    fn test_unsorted_periods_rejected() {
        let mut data = points(6);
        data.swap(2, 3);
        match ForecastSession::new(fast_config(), data) {
            Err(EngineError::InvalidInput { periods, .. }) => assert!(!periods.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_scenario_covariate() {
        let session = ForecastSession::new(fast_config(), points(12)).unwrap();
        let scenario = Scenario::baseline().with_constant("tv_spend", 5.0);
        assert!(matches!(
            session.forecast(&scenario, None),
            Err(EngineError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_report_serializes() {
        let session = ForecastSession::new(fast_config(), points(20)).unwrap();
        let report = session.run(&Scenario::baseline()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["evaluation"]["status"], "computed");
        assert_eq!(json["mode"], "flat");
        assert_eq!(json["forecast"].as_array().map(|a| a.len()), Some(8));
    }
}
