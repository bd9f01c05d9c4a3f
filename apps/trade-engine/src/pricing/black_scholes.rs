//! Black-Scholes Pricing
//!
//! European closed form with a fixed rational approximation of the normal CDF
//! so results are reproducible bit for bit across platforms.
//!
//! Reference: Abramowitz & Stegun, Handbook of Mathematical Functions, 26.2.17

// Black-Scholes uses standard mathematical notation (s, k, t, r, v)
// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::error::PricingError;

// ============================================================================
// Normal Distribution
// ============================================================================

/// A&S 26.2.17 coefficient `p`.
pub const AS_P: f64 = 0.231_641_9;
/// A&S 26.2.17 coefficients `b1..b5`.
pub const AS_B: [f64; 5] = [
    0.319_381_530,
    -0.356_563_782,
    1.781_477_937,
    -1.821_255_978,
    1.330_274_429,
];

/// Standard normal PDF.
#[must_use]
pub fn norm_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF (A&S 26.2.17, absolute error below 7.5e-8).
///
/// Evaluated on `|x|` and reflected, so `N(x) + N(-x) == 1` up to rounding.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + AS_P * z);
    let poly = t * (AS_B[0] + t * (AS_B[1] + t * (AS_B[2] + t * (AS_B[3] + t * AS_B[4]))));
    let upper = norm_pdf(z) * poly;
    if x >= 0.0 { 1.0 - upper } else { upper }
}

// ============================================================================
// Pricing
// ============================================================================

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

/// Theoretical price and first-order sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceGreeks {
    /// Theoretical price.
    pub price: f64,
    /// dPrice/dSpot.
    pub delta: f64,
    /// dDelta/dSpot.
    pub gamma: f64,
    /// dPrice/dTime, annualized.
    pub theta: f64,
    /// dPrice/dVolatility, per unit of volatility.
    pub vega: f64,
    /// dPrice/dRate, per unit of rate.
    pub rho: f64,
}

/// Validate model inputs.
pub(crate) fn validate(spot: f64, strike: f64, t: f64, volatility: f64) -> Result<(), PricingError> {
    let checks = [
        ("spot", spot),
        ("strike", strike),
        ("time to expiry", t),
        ("volatility", volatility),
    ];
    for (name, value) in checks {
        if !value.is_finite() || value <= 0.0 {
            return Err(PricingError::InvalidInput {
                message: format!("{name} must be positive, got: {value}"),
            });
        }
    }
    Ok(())
}

/// Black-Scholes `(d1, d2)`.
fn d1_d2(s: f64, k: f64, r: f64, t: f64, v: f64) -> (f64, f64) {
    let v_sqrt_t = v * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * v * v) * t) / v_sqrt_t;
    (d1, d1 - v_sqrt_t)
}

/// Price and Greeks of a European option.
///
/// # Arguments
///
/// * `kind` - Call or put
/// * `spot` - Underlying price
/// * `strike` - Strike price
/// * `rate` - Risk-free rate (annualized, continuous)
/// * `t` - Time to expiry (years)
/// * `volatility` - Volatility (annualized)
pub fn price_and_greeks(
    kind: OptionKind,
    spot: f64,
    strike: f64,
    rate: f64,
    t: f64,
    volatility: f64,
) -> Result<PriceGreeks, PricingError> {
    validate(spot, strike, t, volatility)?;
    if !rate.is_finite() {
        return Err(PricingError::InvalidInput {
            message: format!("rate must be finite, got: {rate}"),
        });
    }

    let (s, k, r, v) = (spot, strike, rate, volatility);
    let sqrt_t = t.sqrt();
    let (d1, d2) = d1_d2(s, k, r, t, v);
    let discount = (-r * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let gamma = pdf_d1 / (s * v * sqrt_t);
    let vega = s * sqrt_t * pdf_d1;
    let decay = -(s * pdf_d1 * v) / (2.0 * sqrt_t);

    let greeks = match kind {
        OptionKind::Call => {
            let n_d1 = norm_cdf(d1);
            let n_d2 = norm_cdf(d2);
            PriceGreeks {
                price: s * n_d1 - k * discount * n_d2,
                delta: n_d1,
                gamma,
                theta: decay - r * k * discount * n_d2,
                vega,
                rho: k * t * discount * n_d2,
            }
        }
        OptionKind::Put => {
            let n_neg_d1 = norm_cdf(-d1);
            let n_neg_d2 = norm_cdf(-d2);
            PriceGreeks {
                price: k * discount * n_neg_d2 - s * n_neg_d1,
                delta: -n_neg_d1,
                gamma,
                theta: decay + r * k * discount * n_neg_d2,
                vega,
                rho: -k * t * discount * n_neg_d2,
            }
        }
    };

    Ok(greeks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients() {
        assert_eq!(AS_P, 0.2316419);
        assert_eq!(
            AS_B,
            [0.319381530, -0.356563782, 1.781477937, -1.821255978, 1.330274429]
        );
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((norm_cdf(1.0) - 0.841_344_746).abs() < 1e-7);
        assert!((norm_cdf(1.96) - 0.975_002_105).abs() < 1e-7);
        assert!((norm_cdf(-1.96) - 0.024_997_895).abs() < 1e-7);
    }

    #[test]
    fn test_norm_cdf_reflection_is_exact() {
        for x in [0.1, 0.5, 1.3, 2.7, 4.0] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, t, v) = (100.0, 95.0, 0.0175, 0.5, 0.25);
        let call = price_and_greeks(OptionKind::Call, s, k, r, t, v).unwrap();
        let put = price_and_greeks(OptionKind::Put, s, k, r, t, v).unwrap();

        let parity = s - k * (-r * t).exp();
        assert!((call.price - put.price - parity).abs() < 1e-6);
        assert!((call.delta - put.delta - 1.0).abs() < 1e-9);
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
    }

    #[test]
    fn test_atm_call_reference_price() {
        // S=K=100, r=5%, T=1, v=20% ≈ 10.4506
        let call = price_and_greeks(OptionKind::Call, 100.0, 100.0, 0.05, 1.0, 0.2).unwrap();
        assert!((call.price - 10.4506).abs() < 1e-3);
        assert!(call.delta > 0.5 && call.delta < 0.7);
        assert!(call.theta < 0.0);
        assert!(call.rho > 0.0);
    }

    #[test]
    fn test_put_signs() {
        let put = price_and_greeks(OptionKind::Put, 100.0, 100.0, 0.05, 1.0, 0.2).unwrap();
        assert!(put.delta < 0.0 && put.delta > -1.0);
        assert!(put.rho < 0.0);
        assert!(put.gamma > 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        for (s, k, t, v) in [
            (0.0, 100.0, 1.0, 0.2),
            (100.0, -1.0, 1.0, 0.2),
            (100.0, 100.0, 0.0, 0.2),
            (100.0, 100.0, 1.0, f64::NAN),
        ] {
            let Err(err) = price_and_greeks(OptionKind::Call, s, k, 0.01, t, v) else {
                panic!("expected invalid input for {s} {k} {t} {v}");
            };
            assert!(matches!(err, PricingError::InvalidInput { .. }));
        }
    }
}
