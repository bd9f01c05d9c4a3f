//! Combo Risk Bounded Context
//!
//! Worst-case settlement loss of a leg snapshot.

pub mod analyzer;
pub mod errors;

pub use analyzer::{ComboRisk, ComboRiskAnalyzer, DEFAULT_BOND_LOT_SIZE, Scenario};
pub use errors::RiskError;
