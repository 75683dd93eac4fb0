//! Reliability Tiers

use serde::{Deserialize, Serialize};

/// Accuracy cut-offs (percent) between reliability tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityThresholds {
    /// Minimum accuracy for `High` (default: 85)
    pub high: f64,
    /// Minimum accuracy for `Moderate` (default: 70)
    pub moderate: f64,
    /// Minimum accuracy for `Limited` (default: 50)
    pub limited: f64,
}

impl Default for ReliabilityThresholds {
    fn default() -> Self {
        Self {
            high: 85.0,
            moderate: 70.0,
            limited: 50.0,
        }
    }
}

/// How far a forecast can be trusted, from hold-out accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    High,
    Moderate,
    Limited,
    Low,
    /// No hold-out accuracy was available
    Unknown,
}

impl Reliability {
    /// Tier of an accuracy percentage
    pub fn from_accuracy(accuracy: Option<f64>, thresholds: &ReliabilityThresholds) -> Self {
        match accuracy {
            None => Reliability::Unknown,
            Some(a) if a >= thresholds.high => Reliability::High,
            Some(a) if a >= thresholds.moderate => Reliability::Moderate,
            Some(a) if a >= thresholds.limited => Reliability::Limited,
            Some(_) => Reliability::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::High => "high",
            Reliability::Moderate => "moderate",
            Reliability::Limited => "limited",
            Reliability::Low => "low",
            Reliability::Unknown => "unknown",
        }
    }

    /// Recommended use of the forecast
    pub fn guidance(&self) -> &'static str {
        match self {
            Reliability::High => "Suitable for inventory and budget planning",
            Reliability::Moderate => "Use for planning with a safety margin",
            Reliability::Limited => "Use as a directional trend only",
            Reliability::Low => "Do not plan on this forecast; collect more history",
            Reliability::Unknown => "Series too short to measure accuracy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        let t = ReliabilityThresholds::default();
        assert_eq!(Reliability::from_accuracy(Some(92.0), &t), Reliability::High);
        assert_eq!(Reliability::from_accuracy(Some(85.0), &t), Reliability::High);
        assert_eq!(Reliability::from_accuracy(Some(71.5), &t), Reliability::Moderate);
        assert_eq!(Reliability::from_accuracy(Some(50.0), &t), Reliability::Limited);
        assert_eq!(Reliability::from_accuracy(Some(12.0), &t), Reliability::Low);
        assert_eq!(Reliability::from_accuracy(None, &t), Reliability::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Reliability::Moderate.as_str(), "moderate");
        assert!(!Reliability::Unknown.guidance().is_empty());
    }
}
