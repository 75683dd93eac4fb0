//! Hold-out Evaluation
//!
//! Trains a model on the chronological training segment only, scores it on
//! the held-out tail and cross-validates it inside the training segment.

use chrono::NaiveDate;
use feature_engine::{FeatureEngineer, FeatureSpec, FeatureVector};
use serde::{Deserialize, Serialize};
use series::{Dataset, Splitter, MIN_EVALUATION_PERIODS};
use tracing::{debug, info, warn};
use trainer::{Model, Trainer};

use crate::config::{CvStrategy, EvaluatorConfig};
use crate::error::EvaluationError;
use crate::folds::folds;
use crate::metrics::{mae, Metrics};

/// Actual and predicted value of one held-out period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPrediction {
    pub period_start: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Cross-validation result inside the training segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub strategy: CvStrategy,
    /// MAE of each fold, in fold order
    pub fold_mae: Vec<f64>,
    /// Mean of the fold MAEs
    pub mean_mae: f64,
    /// Sample standard deviation of the fold MAEs
    pub std_mae: f64,
}

impl CrossValidation {
    fn from_scores(strategy: CvStrategy, fold_mae: Vec<f64>) -> Self {
        let n = fold_mae.len() as f64;
        let mean_mae = fold_mae.iter().sum::<f64>() / n;
        let std_mae = if fold_mae.len() < 2 {
            0.0
        } else {
            (fold_mae.iter().map(|m| (m - mean_mae).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };
        Self {
            strategy,
            fold_mae,
            mean_mae,
            std_mae,
        }
    }
}

/// Metrics of a model trained on the training segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Scores on the held-out periods
    pub test: Metrics,
    /// In-sample scores on the training periods
    pub train: Metrics,
    /// Absent when the training segment is too short for the fold count
    pub cross_validation: Option<CrossValidation>,
    pub train_periods: usize,
    pub test_periods: usize,
    /// Held-out periods with their predictions
    pub predictions: Vec<PeriodPrediction>,
}

impl EvaluationReport {
    /// Hold-out accuracy, when defined
    pub fn accuracy(&self) -> Option<f64> {
        self.test.accuracy
    }
}

/// Evaluation result, or the reason it was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Computed(EvaluationReport),
    NotComputed { reason: String, periods: usize },
}

impl EvaluationOutcome {
    /// Report, if evaluation ran
    pub fn report(&self) -> Option<&EvaluationReport> {
        match self {
            EvaluationOutcome::Computed(report) => Some(report),
            EvaluationOutcome::NotComputed { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        self.report().is_some()
    }
}

/// Scores models trained on the chronological training segment
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
    trainer: Trainer,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig, trainer: Trainer) -> Result<Self, EvaluationError> {
        config.validate()?;
        Ok(Self { config, trainer })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Split `dataset`, train on the head and score the tail
    ///
    /// Features are computed over the whole dataset so held-out periods see
    /// their real history; the model never sees held-out targets.
    pub fn evaluate(
        &self,
        engineer: &FeatureEngineer,
        dataset: &Dataset,
        splitter: &Splitter,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let split = splitter.split(dataset);
        if !split.is_evaluable() {
            warn!(
                "Evaluation not computed: {} periods, need at least {}",
                dataset.len(),
                MIN_EVALUATION_PERIODS
            );
            return Ok(EvaluationOutcome::NotComputed {
                reason: format!(
                    "need at least {} periods for a hold-out split, got {}",
                    MIN_EVALUATION_PERIODS,
                    dataset.len()
                ),
                periods: dataset.len(),
            });
        }

        let spec = engineer.spec();
        let vectors = engineer.transform(dataset);
        let targets = dataset.targets();
        let cut = split.train_len();
        info!(
            "Evaluating on {} train / {} test periods",
            cut,
            dataset.len() - cut
        );

        let model = self.trainer.fit(spec, &vectors[..cut], &targets[..cut])?;

        let test_predicted = clamped(model.predict(spec, &vectors[cut..])?);
        let test = Metrics::compute(&targets[cut..], &test_predicted)?;
        let train_predicted = clamped(model.predict(spec, &vectors[..cut])?);
        let train = Metrics::compute(&targets[..cut], &train_predicted)?;

        let cross_validation = self.cross_validate(spec, &vectors[..cut], &targets[..cut])?;

        let predictions = vectors[cut..]
            .iter()
            .zip(&targets[cut..])
            .zip(&test_predicted)
            .map(|((v, actual), predicted)| PeriodPrediction {
                period_start: v.period_start,
                actual: *actual,
                predicted: *predicted,
            })
            .collect();

        info!(
            "Hold-out MAE {:.2}, RMSE {:.2}, accuracy {}",
            test.mae,
            test.rmse,
            test.accuracy
                .map(|a| format!("{:.1}%", a))
                .unwrap_or_else(|| "n/a".to_string())
        );

        Ok(EvaluationOutcome::Computed(EvaluationReport {
            test,
            train,
            cross_validation,
            train_periods: cut,
            test_periods: dataset.len() - cut,
            predictions,
        }))
    }

    /// Mean MAE over folds of the training segment; `None` when it is too short
    pub fn cross_validate(
        &self,
        spec: &FeatureSpec,
        vectors: &[FeatureVector],
        targets: &[f64],
    ) -> Result<Option<CrossValidation>, EvaluationError> {
        let strategy = self.config.cv_strategy;
        let folds = folds(vectors.len(), self.config.cv_folds, strategy);
        if folds.is_empty() {
            warn!(
                "Skipping {}-fold cross-validation: {} training periods, need {}",
                self.config.cv_folds,
                vectors.len(),
                self.config.min_cv_periods()
            );
            return Ok(None);
        }

        let mut fold_mae = Vec::with_capacity(folds.len());
        for (i, fold) in folds.iter().enumerate() {
            let train_vectors: Vec<FeatureVector> = fold.train_indices().map(|j| vectors[j].clone()).collect();
            let train_targets: Vec<f64> = fold.train_indices().map(|j| targets[j]).collect();

            let model: Model = self.trainer.fit(spec, &train_vectors, &train_targets)?;
            let predicted = clamped(model.predict(spec, &vectors[fold.test.clone()])?);
            let score = mae(&targets[fold.test.clone()], &predicted);

            debug!(
                "CV fold {} ({}): train {} periods, test {}..{}, MAE {:.2}",
                i + 1,
                strategy.as_str(),
                fold.train_len(),
                fold.test.start,
                fold.test.end,
                score
            );
            fold_mae.push(score);
        }

        let cv = CrossValidation::from_scores(strategy, fold_mae);
        info!(
            "{}-fold {} CV MAE {:.2} (+/- {:.2})",
            cv.fold_mae.len(),
            strategy.as_str(),
            cv.mean_mae,
            cv.std_mae
        );
        Ok(Some(cv))
    }
}

/// Predictions floored at zero
pub fn clamped(predictions: Vec<f64>) -> Vec<f64> {
    predictions.into_iter().map(|p| p.max(0.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FeatureConfig;
    use series::TimeSeriesPoint;
    use trainer::Hyperparameters;

    fn week(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::weeks(i)
    }

    fn dataset(targets: impl IntoIterator<Item = f64>) -> Dataset {
        Dataset::new(
            targets
                .into_iter()
                .enumerate()
                .map(|(i, t)| TimeSeriesPoint::new(week(i as i64), t))
                .collect(),
        )
        .unwrap()
    }

    fn evaluator(config: EvaluatorConfig) -> Evaluator {
        let hyperparameters = Hyperparameters {
            tree_count: 50,
            ..Default::default()
        };
        Evaluator::new(config, Trainer::new(hyperparameters).unwrap()).unwrap()
    }

    fn run(dataset: &Dataset, config: EvaluatorConfig) -> EvaluationOutcome {
        let engineer = FeatureEngineer::fit(dataset, &FeatureConfig::default()).unwrap();
        let splitter = Splitter::new(0.8).unwrap();
        evaluator(config).evaluate(&engineer, dataset, &splitter).unwrap()
    }

    #[test]
    fn test_short_series_not_computed() {
        let outcome = run(&dataset([1.0, 2.0, 3.0, 4.0]), EvaluatorConfig::default());
        assert_eq!(
            outcome,
            EvaluationOutcome::NotComputed {
                reason: "need at least 5 periods for a hold-out split, got 4".to_string(),
                periods: 4,
            }
        );
    }

    #[test]
    fn test_computed_report() {
        let data = dataset((0..30).map(|i| 500.0 + (i % 4) as f64 * 50.0));
        let outcome = run(&data, EvaluatorConfig::default());
        let report = outcome.report().unwrap();

        assert_eq!(report.train_periods, 24);
        assert_eq!(report.test_periods, 6);
        assert_eq!(report.predictions.len(), 6);
        assert_eq!(report.predictions[0].period_start, week(24));
        assert!(report.predictions.iter().all(|p| p.predicted >= 0.0));
        assert!(report.test.mape.is_some());

        let cv = report.cross_validation.as_ref().unwrap();
        assert_eq!(cv.strategy, CvStrategy::KFold);
        assert_eq!(cv.fold_mae.len(), 5);
        assert!(cv.mean_mae.is_finite());
    }

    #[test]
    fn test_cv_skipped_for_short_training_segment() {
        // 12 periods: 9 train < 2 * 5 folds
        let data = dataset((0..12).map(|i| 100.0 + i as f64));
        let report = run(&data, EvaluatorConfig::default()).report().cloned().unwrap();
        assert!(report.cross_validation.is_none());
    }

    #[test]
    fn test_expanding_cv() {
        let data = dataset((0..40).map(|i| 100.0 + 3.0 * i as f64));
        let config = EvaluatorConfig {
            cv_folds: 3,
            cv_strategy: CvStrategy::Expanding,
        };
        let report = run(&data, config).report().cloned().unwrap();
        let cv = report.cross_validation.unwrap();
        assert_eq!(cv.strategy, CvStrategy::Expanding);
        assert_eq!(cv.fold_mae.len(), 3);
    }

    #[test]
    fn test_zero_actuals_keep_metrics_finite() {
        let mut targets: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        for t in targets.iter_mut().skip(16) {
            *t = 0.0;
        }
        let report = run(&dataset(targets), EvaluatorConfig::default()).report().cloned().unwrap();
        assert_eq!(report.test.mape, None);
        assert_eq!(report.test.accuracy, None);
        assert!(report.test.mae.is_finite());
    }

    #[test]
    fn test_single_fold_rejected() {
        let config = EvaluatorConfig {
            cv_folds: 1,
            ..Default::default()
        };
        let trainer = Trainer::new(Hyperparameters::default()).unwrap();
        assert!(matches!(
            Evaluator::new(config, trainer),
            Err(EvaluationError::InvalidConfig(_))
        ));
    }
}
