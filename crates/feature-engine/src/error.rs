//! Feature Error Types

use thiserror::Error;

/// Errors during feature derivation or synthesis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Feature configuration cannot produce a valid spec
    #[error("Invalid feature configuration: {0}")]
    InvalidConfig(String),

    /// Requested features disagree with the declared spec
    #[error("Feature mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    FeatureMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// A future row needs at least one historical period to seed from
    #[error("Cannot synthesize features without history")]
    EmptyHistory,
}
