//! Trainer and Fitted Model

use boosting::GradientBoostingRegressor;
use chrono::NaiveDate;
use feature_engine::{FeatureSpec, FeatureVector};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::imputer::Imputer;
use crate::{Hyperparameters, TrainerError};

/// Fits models with fixed hyperparameters
#[derive(Debug, Clone)]
pub struct Trainer {
    hyperparameters: Hyperparameters,
}

impl Trainer {
    /// Create a trainer, rejecting out-of-range hyperparameters
    pub fn new(hyperparameters: Hyperparameters) -> Result<Self, TrainerError> {
        hyperparameters.validate()?;
        Ok(Self { hyperparameters })
    }

    /// Hyperparameters used for every fit
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Fit a model on vectors that follow `spec`
    pub fn fit(&self, spec: &FeatureSpec, vectors: &[FeatureVector], targets: &[f64]) -> Result<Model, TrainerError> {
        if vectors.is_empty() {
            return Err(TrainerError::EmptyTrainingSet);
        }
        if vectors.len() != targets.len() {
            return Err(TrainerError::TargetCountMismatch {
                vectors: vectors.len(),
                targets: targets.len(),
            });
        }
        check_widths(spec, vectors)?;
        if let Some((vector, _)) = vectors.iter().zip(targets).find(|(_, t)| !t.is_finite()) {
            return Err(TrainerError::NonFiniteTarget {
                period: vector.period_start,
            });
        }

        let imputer = Imputer::fit(spec, vectors);
        let design = design_matrix(&imputer, vectors, spec.len());
        let y = Array1::from_vec(targets.to_vec());

        debug!(
            "Training on {} periods ({} features, {} missing values imputed)",
            vectors.len(),
            spec.len(),
            vectors.iter().map(|v| v.missing_count()).sum::<usize>()
        );

        let regressor = GradientBoostingRegressor::fit(design.view(), y.view(), &self.hyperparameters)?;

        let trained_through = vectors.iter().map(|v| v.period_start).max();
        info!(
            "Model trained on {} periods{}",
            vectors.len(),
            trained_through
                .map(|d| format!(" through {}", d))
                .unwrap_or_default()
        );

        Ok(Model {
            spec: spec.clone(),
            imputer,
            regressor,
            training_periods: vectors.len(),
            trained_through,
        })
    }
}

/// Fitted forecasting model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    spec: FeatureSpec,
    imputer: Imputer,
    regressor: GradientBoostingRegressor,
    training_periods: usize,
    trained_through: Option<NaiveDate>,
}

impl Model {
    /// Raw predictions for vectors built under `spec`
    ///
    /// Fails unless `spec` declares the model's features in the same order.
    pub fn predict(&self, spec: &FeatureSpec, vectors: &[FeatureVector]) -> Result<Vec<f64>, TrainerError> {
        self.spec.ensure_matches(spec)?;
        check_widths(&self.spec, vectors)?;

        vectors
            .iter()
            .map(|v| {
                self.regressor
                    .predict_row(&self.imputer.fill(v))
                    .map_err(TrainerError::from)
            })
            .collect()
    }

    /// Raw prediction for one vector built under the model's own spec
    pub fn predict_one(&self, vector: &FeatureVector) -> Result<f64, TrainerError> {
        check_widths(&self.spec, std::slice::from_ref(vector))?;
        Ok(self.regressor.predict_row(&self.imputer.fill(vector))?)
    }

    /// Feature spec the model was trained with
    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// Normalized total split gain per feature, in spec order
    pub fn feature_importances(&self) -> Vec<f64> {
        self.regressor.feature_importances()
    }

    /// Frozen imputation values
    pub fn imputer(&self) -> &Imputer {
        &self.imputer
    }

    /// Underlying ensemble
    pub fn regressor(&self) -> &GradientBoostingRegressor {
        &self.regressor
    }

    /// Number of training periods
    pub fn training_periods(&self) -> usize {
        self.training_periods
    }

    /// Latest training period
    pub fn trained_through(&self) -> Option<NaiveDate> {
        self.trained_through
    }
}

fn check_widths(spec: &FeatureSpec, vectors: &[FeatureVector]) -> Result<(), TrainerError> {
    match vectors.iter().find(|v| v.len() != spec.len()) {
        Some(v) => Err(TrainerError::WidthMismatch {
            period: v.period_start,
            expected: spec.len(),
            actual: v.len(),
        }),
        None => Ok(()),
    }
}

fn design_matrix(imputer: &Imputer, vectors: &[FeatureVector], width: usize) -> Array2<f64> {
    let mut design = Array2::zeros((vectors.len(), width));
    for (i, vector) in vectors.iter().enumerate() {
        for (j, value) in imputer.fill(vector).into_iter().enumerate() {
            design[[i, j]] = value;
        }
    }
    design
}
