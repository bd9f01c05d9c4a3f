//! Pricing errors.

use thiserror::Error;

/// Errors from option pricing and implied volatility.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// Input parameters outside the model's domain.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },

    /// Newton-Raphson did not meet the tolerance.
    #[error(
        "IV solver failed to converge after {iterations} iterations (last error: {last_error:.6})"
    )]
    Convergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last absolute price error.
        last_error: f64,
    },

    /// The iteration reached a volatility or vega it cannot continue from.
    #[error("Degenerate volatility {volatility} (vega {vega:e})")]
    DegenerateVolatility {
        /// Volatility at the failing step.
        volatility: f64,
        /// Vega at the failing step.
        vega: f64,
    },
}

impl PricingError {
    /// Whether a fallback volatility may be used instead.
    #[must_use]
    pub const fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            Self::Convergence { .. } | Self::DegenerateVolatility { .. }
        )
    }
}
