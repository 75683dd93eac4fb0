//! Gradient Boosting
//!
//! Second-order boosted regression trees with L2-regularized leaf weights,
//! gain-based split scoring and seeded row/feature subsampling.

mod config;
mod error;
mod regressor;
mod tree;

pub use config::BoostingConfig;
pub use error::BoostingError;
pub use regressor::GradientBoostingRegressor;
pub use tree::TreeNode;
