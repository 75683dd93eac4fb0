//! Frozen Mean Imputation

use feature_engine::{FeatureSpec, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-feature fill values computed once from the training vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    fills: Vec<f64>,
}

impl Imputer {
    /// Column means of the observed values; 0 for columns never observed
    ///
    /// Vectors are expected to match the feature spec's width.
    pub fn fit(spec: &FeatureSpec, vectors: &[FeatureVector]) -> Self {
        let width = spec.len();
        let mut sums = vec![0.0; width];
        let mut counts = vec![0usize; width];

        for vector in vectors {
            for (j, value) in vector.values.iter().enumerate().take(width) {
                if let Some(v) = value {
                    sums[j] += v;
                    counts[j] += 1;
                }
            }
        }

        let fills = sums
            .iter()
            .zip(&counts)
            .enumerate()
            .map(|(j, (sum, &count))| {
                if count == 0 {
                    warn!(
                        "Feature '{}' is missing in every training row, imputing 0",
                        spec.features()[j].name
                    );
                    0.0
                } else {
                    sum / count as f64
                }
            })
            .collect();

        Self { fills }
    }

    /// Dense copy of a vector with missing values replaced
    pub fn fill(&self, vector: &FeatureVector) -> Vec<f64> {
        vector
            .values
            .iter()
            .zip(&self.fills)
            .map(|(value, fill)| value.unwrap_or(*fill))
            .collect()
    }

    /// Fill value per feature
    pub fn fills(&self) -> &[f64] {
        &self.fills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use feature_engine::{FeatureDef, FeatureGroup, FeatureKind};

    fn spec() -> FeatureSpec {
        FeatureSpec::from_defs(vec![
            FeatureDef {
                name: "target_lag_1".into(),
                group: FeatureGroup::Lag,
                kind: FeatureKind::TargetLag { lag: 1 },
            },
            FeatureDef {
                name: "cov_buyers".into(),
                group: FeatureGroup::Covariate,
                kind: FeatureKind::Covariate {
                    column: "buyers".into(),
                },
            },
        ])
        .unwrap()
    }

    fn vector(values: Vec<Option<f64>>) -> FeatureVector {
        FeatureVector {
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            values,
        }
    }

    #[test]
    fn test_means_of_observed_values() {
        let imputer = Imputer::fit(
            &spec(),
            &[
                vector(vec![None, None]),
                vector(vec![Some(10.0), None]),
                vector(vec![Some(20.0), None]),
            ],
        );
        assert_eq!(imputer.fills(), &[15.0, 0.0]);
        assert_eq!(imputer.fill(&vector(vec![None, Some(3.0)])), vec![15.0, 3.0]);
    }
}
