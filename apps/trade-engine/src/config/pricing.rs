//! Pricing model configuration for options analytics.

use serde::{Deserialize, Serialize};

use crate::pricing::{ContractPricer, GreeksModel, IvSolver, IvSolverConfig};

/// Pricing model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// IV solver tolerance (absolute price error).
    #[serde(default = "default_iv_tolerance")]
    pub iv_tolerance: f64,
    /// IV solver iteration cap.
    #[serde(default = "default_iv_max_iterations")]
    pub iv_max_iterations: u32,
    /// Volatility used when the IV solver fails and no per-contract value is known.
    #[serde(default)]
    pub default_historical_volatility: Option<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            iv_tolerance: default_iv_tolerance(),
            iv_max_iterations: default_iv_max_iterations(),
            default_historical_volatility: None,
        }
    }
}

impl PricingConfig {
    /// Solver configuration derived from this section.
    #[must_use]
    pub const fn solver_config(&self) -> IvSolverConfig {
        IvSolverConfig {
            max_iterations: self.iv_max_iterations,
            tolerance: self.iv_tolerance,
        }
    }

    /// Build the contract pricer described by this section.
    #[must_use]
    pub const fn pricer(&self) -> ContractPricer {
        ContractPricer::new(IvSolver::new(self.solver_config()), self.risk_free_rate)
    }

    /// Position Greeks model at the configured historical volatility.
    #[must_use]
    pub fn greeks_model(&self) -> Option<GreeksModel> {
        self.default_historical_volatility
            .map(|volatility| GreeksModel::new(volatility, self.risk_free_rate))
    }
}

const fn default_risk_free_rate() -> f64 {
    0.0175
}

const fn default_iv_tolerance() -> f64 {
    1e-4
}

const fn default_iv_max_iterations() -> u32 {
    100
}
