//! Strategy Classification Bounded Context

pub mod classifier;
pub mod errors;
mod kind;

pub use classifier::{LegBuckets, StrategyClassifier};
pub use errors::StrategyError;
pub use kind::Strategy;
