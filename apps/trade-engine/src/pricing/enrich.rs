//! Contract enrichment with implied volatility and Greeks.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ledger::ContractDescriptor;
use crate::domain::shared::ContractId;

use super::black_scholes::{OptionKind, PriceGreeks, price_and_greeks};
use super::error::PricingError;
use super::greeks::years_to_expiry;
use super::iv::IvSolver;

/// Where the volatility used for the Greeks came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilitySource {
    /// Solved from the observed option price.
    Implied,
    /// Supplied historical volatility, used after the solver failed.
    Historical,
}

/// Analytics of one option contract at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionAnalytics {
    /// Contract analyzed.
    pub contract_id: ContractId,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Volatility used for pricing.
    pub volatility: f64,
    /// Origin of `volatility`.
    pub volatility_source: VolatilitySource,
    /// Model price and Greeks at `volatility`.
    pub greeks: PriceGreeks,
}

/// Prices option contracts against an observed market price.
#[derive(Debug, Clone)]
pub struct ContractPricer {
    solver: IvSolver,
    risk_free_rate: f64,
}

impl ContractPricer {
    /// Create a pricer.
    #[must_use]
    pub const fn new(solver: IvSolver, risk_free_rate: f64) -> Self {
        Self {
            solver,
            risk_free_rate,
        }
    }

    /// Get the risk-free rate.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Solve IV and compute Greeks for an option contract.
    ///
    /// When the solver fails and `historical_volatility` is supplied, the
    /// Greeks are computed at the historical volatility instead.
    pub fn analyze(
        &self,
        contract: &ContractDescriptor,
        spot: f64,
        observed_price: f64,
        as_of: NaiveDate,
        historical_volatility: Option<f64>,
    ) -> Result<OptionAnalytics, PricingError> {
        let Some(terms) = contract.option_terms() else {
            return Err(PricingError::InvalidInput {
                message: format!("contract {} is not an option", contract.id()),
            });
        };

        let t = years_to_expiry(as_of, terms.expiry);
        if t <= 0.0 {
            return Err(PricingError::InvalidInput {
                message: format!("contract {} expired on {}", contract.id(), terms.expiry),
            });
        }
        let strike = terms.strike.to_f64().ok_or_else(|| PricingError::InvalidInput {
            message: format!("strike {} is not representable", terms.strike),
        })?;
        let kind = OptionKind::from(terms.right);

        let (volatility, volatility_source) =
            match self
                .solver
                .solve(kind, spot, strike, self.risk_free_rate, t, observed_price)
            {
                Ok(iv) => (iv, VolatilitySource::Implied),
                Err(err) if err.is_solver_failure() => match historical_volatility {
                    Some(hv) => {
                        warn!(
                            contract_id = %contract.id(),
                            error = %err,
                            historical_volatility = hv,
                            "IV solver failed, falling back to historical volatility"
                        );
                        (hv, VolatilitySource::Historical)
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            };

        let greeks = price_and_greeks(kind, spot, strike, self.risk_free_rate, t, volatility)?;

        Ok(OptionAnalytics {
            contract_id: contract.id(),
            time_to_expiry: t,
            volatility,
            volatility_source,
            greeks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::OptionRight;
    use rust_decimal_macros::dec;

    fn put() -> ContractDescriptor {
        let expiry = NaiveDate::from_ymd_opt(2025, 9, 19).unwrap();
        ContractDescriptor::option(ContractId::new(7), "XYZ", OptionRight::Put, dec!(100), expiry)
            .unwrap()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()
    }

    #[test]
    fn solves_implied_volatility() {
        let pricer = ContractPricer::new(IvSolver::default(), 0.0175);
        let t = years_to_expiry(as_of(), NaiveDate::from_ymd_opt(2025, 9, 19).unwrap());
        let observed = price_and_greeks(OptionKind::Put, 100.0, 100.0, 0.0175, t, 0.28)
            .unwrap()
            .price;

        let analytics = pricer.analyze(&put(), 100.0, observed, as_of(), None).unwrap();
        assert_eq!(analytics.volatility_source, VolatilitySource::Implied);
        assert!((analytics.volatility - 0.28).abs() < 1e-4);
        assert!(analytics.greeks.delta < 0.0);
    }

    #[test]
    fn falls_back_to_historical_volatility() {
        let pricer = ContractPricer::new(IvSolver::default(), 0.0175);
        // Quoted far below intrinsic: the solver cannot reproduce it.
        let analytics = pricer.analyze(&put(), 50.0, 1.0, as_of(), Some(0.4)).unwrap();
        assert_eq!(analytics.volatility_source, VolatilitySource::Historical);
        assert_eq!(analytics.volatility, 0.4);
    }

    #[test]
    fn solver_failure_without_fallback_propagates() {
        let pricer = ContractPricer::new(IvSolver::default(), 0.0175);
        let Err(err) = pricer.analyze(&put(), 50.0, 1.0, as_of(), None) else {
            panic!("expected solver failure");
        };
        assert!(err.is_solver_failure());
    }

    #[test]
    fn non_option_is_invalid() {
        let pricer = ContractPricer::new(IvSolver::default(), 0.0175);
        let stock = ContractDescriptor::stock(ContractId::new(1), "XYZ");
        let result = pricer.analyze(&stock, 100.0, 1.0, as_of(), Some(0.3));
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }

    #[test]
    fn expired_option_is_invalid() {
        let pricer = ContractPricer::new(IvSolver::default(), 0.0175);
        let late = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let result = pricer.analyze(&put(), 100.0, 2.0, late, Some(0.3));
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }
}
