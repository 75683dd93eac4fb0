//! Feature Importance

use std::cmp::Ordering;

use feature_engine::FeatureGroup;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trainer::Model;

/// Relative importance of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub group: FeatureGroup,
    /// Share of total split gain, summing to 1 across features
    pub importance: f64,
}

/// Summed importance of a feature family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupImportance {
    pub group: FeatureGroup,
    pub importance: f64,
    pub features: usize,
}

/// Every feature of the model, most important first; ties ordered by name
pub fn rank_features(model: &Model) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = model
        .spec()
        .features()
        .iter()
        .zip(model.feature_importances())
        .map(|(def, importance)| FeatureImportance {
            name: def.name.clone(),
            group: def.group,
            importance,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    if let Some(top) = ranked.first() {
        debug!("Top feature: {} ({:.1}%)", top.name, top.importance * 100.0);
    }
    ranked
}

/// Importance summed per feature group, largest first
pub fn group_importance(ranked: &[FeatureImportance]) -> Vec<GroupImportance> {
    let mut groups: Vec<GroupImportance> = Vec::new();
    for feature in ranked {
        match groups.iter_mut().find(|g| g.group == feature.group) {
            Some(entry) => {
                entry.importance += feature.importance;
                entry.features += 1;
            }
            None => groups.push(GroupImportance {
                group: feature.group,
                importance: feature.importance,
                features: 1,
            }),
        }
    }

    groups.sort_by(|a, b| b.importance.partial_cmp(&a.importance).unwrap_or(Ordering::Equal));
    groups
}
