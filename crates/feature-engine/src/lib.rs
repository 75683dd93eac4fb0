//! Feature Engineering Engine
//!
//! Derives the ordered feature spec of a sales series and computes one
//! feature vector per period, plus vectors for periods beyond the history.

mod calendar;
mod config;
mod error;
mod features;
mod frame;
mod spec;
mod statistics;

pub use calendar::CalendarField;
pub use config::{FeatureConfig, InteractionPair, MarketingColumns};
pub use error::FeatureError;
pub use features::{FeatureEngineer, FeatureVector};
pub use frame::SeriesFrame;
pub use spec::{FeatureDef, FeatureGroup, FeatureKind, FeatureSpec, MARKETING_WINDOW};
pub use statistics::WindowStats;
