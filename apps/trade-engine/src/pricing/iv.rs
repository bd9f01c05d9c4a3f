//! Implied Volatility Solver
//!
//! Newton-Raphson on the Black-Scholes price. The starting guess is the
//! Brenner-Subrahmanyam approximation `σ₀ = price / spot / (0.398·√T)`.
//! The iteration fails fast instead of returning a volatility it reached
//! through a near-zero vega or a non-positive step.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
#![allow(clippy::many_single_char_names)]

use serde::{Deserialize, Serialize};

use super::black_scholes::{OptionKind, price_and_greeks, validate};
use super::error::PricingError;

/// Vega below this is treated as degenerate.
const MIN_VEGA: f64 = 1e-12;

/// Brenner-Subrahmanyam constant (≈ 1/√(2π)).
const INITIAL_GUESS_FACTOR: f64 = 0.398;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the IV solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvSolverConfig {
    /// Maximum Newton-Raphson iterations.
    pub max_iterations: u32,
    /// Convergence tolerance (absolute price error).
    pub tolerance: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
        }
    }
}

// ============================================================================
// IV Solver
// ============================================================================

/// Implied Volatility Solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl IvSolver {
    /// Create a new IV solver with the given configuration.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration.
    #[must_use]
    pub const fn config(&self) -> &IvSolverConfig {
        &self.config
    }

    /// Solve for the volatility that reproduces `observed_price`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Call or put
    /// * `spot` - Underlying price
    /// * `strike` - Strike price
    /// * `rate` - Risk-free rate (annualized)
    /// * `t` - Time to expiry (years)
    /// * `observed_price` - Market price of the option
    pub fn solve(
        &self,
        kind: OptionKind,
        spot: f64,
        strike: f64,
        rate: f64,
        t: f64,
        observed_price: f64,
    ) -> Result<f64, PricingError> {
        if !observed_price.is_finite() || observed_price <= 0.0 {
            return Err(PricingError::InvalidInput {
                message: format!("Market price must be positive, got: {observed_price}"),
            });
        }

        // Volatility is checked on every iteration below.
        validate(spot, strike, t, 1.0)?;
        let mut sigma = observed_price / spot / (INITIAL_GUESS_FACTOR * t.sqrt());

        let mut last_error = f64::INFINITY;
        for _ in 0..self.config.max_iterations {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(PricingError::DegenerateVolatility {
                    volatility: sigma,
                    vega: f64::NAN,
                });
            }

            let greeks = price_and_greeks(kind, spot, strike, rate, t, sigma)?;
            let diff = observed_price - greeks.price;
            last_error = diff.abs();
            if last_error < self.config.tolerance {
                return Ok(sigma);
            }

            if greeks.vega.is_nan() || greeks.vega < MIN_VEGA {
                return Err(PricingError::DegenerateVolatility {
                    volatility: sigma,
                    vega: greeks.vega,
                });
            }
            sigma += diff / greeks.vega;
        }

        Err(PricingError::Convergence {
            iterations: self.config.max_iterations,
            last_error,
        })
    }
}

/// Implied volatility with the default solver configuration.
pub fn implied_volatility(
    kind: OptionKind,
    spot: f64,
    strike: f64,
    rate: f64,
    t: f64,
    observed_price: f64,
) -> Result<f64, PricingError> {
    IvSolver::default().solve(kind, spot, strike, rate, t, observed_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OptionKind::Call ; "call")]
    #[test_case(OptionKind::Put ; "put")]
    fn test_round_trip(kind: OptionKind) {
        let (s, k, r, t, v) = (100.0, 100.0, 0.02, 0.25, 0.3);
        let price = price_and_greeks(kind, s, k, r, t, v).unwrap().price;

        let iv = implied_volatility(kind, s, k, r, t, price).unwrap();
        assert!((iv - v).abs() < 1e-4, "recovered {iv}");
    }

    #[test]
    fn test_otm_round_trip() {
        let price = price_and_greeks(OptionKind::Call, 100.0, 110.0, 0.0175, 0.5, 0.35)
            .unwrap()
            .price;
        let iv = implied_volatility(OptionKind::Call, 100.0, 110.0, 0.0175, 0.5, price).unwrap();
        assert!((iv - 0.35).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_price_is_invalid() {
        let result = implied_volatility(OptionKind::Call, 100.0, 100.0, 0.02, 0.25, 0.0);
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let result = implied_volatility(OptionKind::Call, 100.0, 100.0, 0.02, -1.0, 5.0);
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }

    #[test]
    fn test_price_below_intrinsic_fails_fast() {
        // Deep ITM put quoted far below intrinsic: no volatility reproduces it.
        let result = implied_volatility(OptionKind::Put, 50.0, 100.0, 0.02, 0.25, 1.0);
        let Err(err) = result else {
            panic!("expected solver failure");
        };
        assert!(err.is_solver_failure(), "got {err}");
    }

    #[test]
    fn test_iteration_cap() {
        let solver = IvSolver::new(IvSolverConfig {
            max_iterations: 1,
            tolerance: 1e-12,
        });
        let price = price_and_greeks(OptionKind::Call, 100.0, 120.0, 0.02, 0.25, 0.6)
            .unwrap()
            .price;
        let result = solver.solve(OptionKind::Call, 100.0, 120.0, 0.02, 0.25, price);
        assert!(matches!(
            result,
            Err(PricingError::Convergence { iterations: 1, .. })
        ));
    }
}
