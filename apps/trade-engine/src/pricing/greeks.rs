//! Greeks aggregation.
//!
//! Scales per-contract sensitivities by signed quantity and multiplier and
//! sums them across a trade's option legs.

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{LegMap, OptionRight, SecType, VirtualLeg};

use super::black_scholes::{OptionKind, PriceGreeks, price_and_greeks};
use super::error::PricingError;

/// Calendar days per year used for time to expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Greeks for an option or a combo.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of value with respect to the underlying price.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to the underlying price.
    pub gamma: f64,
    /// Theta - rate of change of value with respect to time (annualized).
    pub theta: f64,
    /// Vega - sensitivity to volatility (per unit).
    pub vega: f64,
    /// Rho - sensitivity to the risk-free rate (per unit).
    pub rho: f64,
}

impl Greeks {
    /// Scale Greeks by a quantity (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Add another Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }

    /// Create zero Greeks.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        }
    }
}

impl From<PriceGreeks> for Greeks {
    fn from(value: PriceGreeks) -> Self {
        Self {
            delta: value.delta,
            gamma: value.gamma,
            theta: value.theta,
            vega: value.vega,
            rho: value.rho,
        }
    }
}

impl From<OptionRight> for OptionKind {
    fn from(right: OptionRight) -> Self {
        match right {
            OptionRight::Call => Self::Call,
            OptionRight::Put => Self::Put,
        }
    }
}

/// Years between `as_of` and `expiry`, on a calendar-day basis.
#[must_use]
pub fn years_to_expiry(as_of: NaiveDate, expiry: NaiveDate) -> f64 {
    (expiry - as_of).num_days() as f64 / DAYS_PER_YEAR
}

/// Aggregate Greeks of the open option legs.
///
/// Each leg is priced at the same `spot` and `volatility`, scaled by its
/// signed quantity times multiplier. Expired legs contribute nothing.
pub fn position_greeks<'a>(
    legs: impl IntoIterator<Item = &'a VirtualLeg>,
    spot: f64,
    volatility: f64,
    rate: f64,
    as_of: NaiveDate,
) -> Result<Greeks, PricingError> {
    let mut total = Greeks::zero();

    for leg in legs.into_iter().filter(|leg| leg.is_open()) {
        let Some(terms) = leg.contract.option_terms() else {
            continue;
        };
        let t = years_to_expiry(as_of, terms.expiry);
        if t <= 0.0 {
            continue;
        }

        let strike = terms.strike.to_f64().ok_or_else(|| PricingError::InvalidInput {
            message: format!("strike {} is not representable", terms.strike),
        })?;
        let quantity = leg.quantity.to_f64().ok_or_else(|| PricingError::InvalidInput {
            message: format!("quantity {} is not representable", leg.quantity),
        })?;

        let greeks = price_and_greeks(terms.right.into(), spot, strike, rate, t, volatility)?;
        let size = quantity * f64::from(terms.multiplier);
        total = total.add(&Greeks::from(greeks).scale(size));
    }

    Ok(total)
}

/// Prices a trade's option legs off its quoted underlying at one volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreeksModel {
    volatility: f64,
    rate: f64,
    as_of: Option<NaiveDate>,
}

impl GreeksModel {
    /// Create a model valued as of today.
    #[must_use]
    pub const fn new(volatility: f64, rate: f64) -> Self {
        Self {
            volatility,
            rate,
            as_of: None,
        }
    }

    /// Value the legs as of a fixed date instead of today.
    #[must_use]
    pub const fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Aggregate Greeks of the open option legs.
    ///
    /// The spot is the last quote of a stock leg on `underlying`. Returns
    /// `None` when there is no such quote or no open option leg.
    pub fn evaluate(&self, underlying: &str, legs: &LegMap) -> Result<Option<Greeks>, PricingError> {
        let has_options = legs
            .values()
            .any(|leg| leg.is_open() && leg.contract.option_terms().is_some());
        if !has_options {
            return Ok(None);
        }

        let Some(spot) = legs
            .values()
            .filter(|leg| {
                leg.contract.sec_type() == SecType::Stock && leg.contract.symbol() == underlying
            })
            .find_map(|leg| leg.price)
            .and_then(|price| price.to_f64())
        else {
            return Ok(None);
        };

        let as_of = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        position_greeks(legs.values(), spot, self.volatility, self.rate, as_of).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::ContractDescriptor;
    use crate::domain::shared::ContractId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn leg(id: i64, right: OptionRight, strike: Decimal, quantity: Decimal) -> VirtualLeg {
        let expiry = NaiveDate::from_ymd_opt(2025, 12, 19).unwrap();
        let contract =
            ContractDescriptor::option(ContractId::new(id), "XYZ", right, strike, expiry).unwrap();
        let mut leg = VirtualLeg::new(contract);
        leg.quantity = quantity;
        leg
    }

    #[test]
    fn greeks_scale_and_add() {
        let g = Greeks {
            delta: 0.5,
            gamma: 0.02,
            theta: -5.0,
            vega: 20.0,
            rho: 10.0,
        };
        let short = g.scale(-2.0);
        assert_eq!(short.delta, -1.0);
        assert_eq!(g.add(&short).vega, -20.0);
        assert_eq!(Greeks::zero(), Greeks::default());
    }

    #[test]
    fn straddle_delta_nets_out() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 19).unwrap();
        let legs = vec![
            leg(1, OptionRight::Call, dec!(100), dec!(1)),
            leg(2, OptionRight::Put, dec!(100), dec!(1)),
        ];
        let greeks = position_greeks(&legs, 100.0, 0.3, 0.0, as_of).unwrap();

        // Call delta + put delta = N(d1) - N(-d1) = 2N(d1) - 1, times 100.
        assert!(greeks.delta.abs() < 20.0);
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
    }

    #[test]
    fn flat_and_expired_legs_are_skipped() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let legs = vec![
            leg(1, OptionRight::Call, dec!(100), dec!(1)),
            leg(2, OptionRight::Put, dec!(100), Decimal::ZERO),
        ];
        let greeks = position_greeks(&legs, 100.0, 0.3, 0.0, as_of).unwrap();
        assert_eq!(greeks, Greeks::zero());
    }

    #[test]
    fn short_put_has_positive_delta() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 19).unwrap();
        let legs = vec![leg(1, OptionRight::Put, dec!(95), dec!(-2))];
        let greeks = position_greeks(&legs, 100.0, 0.25, 0.0175, as_of).unwrap();
        assert!(greeks.delta > 0.0);
        assert!(greeks.vega < 0.0);
    }

    #[test]
    fn years_to_expiry_uses_calendar_days() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(years_to_expiry(as_of, expiry), 1.0);
    }

    fn quoted_stock(price: Option<Decimal>) -> VirtualLeg {
        let mut leg = VirtualLeg::new(ContractDescriptor::stock(ContractId::new(9), "XYZ"));
        leg.quantity = dec!(100);
        leg.price = price;
        leg
    }

    #[test]
    fn model_prices_options_off_the_quoted_underlying() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 19).unwrap();
        let put = leg(1, OptionRight::Put, dec!(95), dec!(-2));
        let legs = LegMap::from([
            (ContractId::new(1), put.clone()),
            (ContractId::new(9), quoted_stock(Some(dec!(100)))),
        ]);

        let greeks = GreeksModel::new(0.25, 0.0175)
            .as_of(as_of)
            .evaluate("XYZ", &legs)
            .unwrap()
            .unwrap();

        let expected = position_greeks([&put], 100.0, 0.25, 0.0175, as_of).unwrap();
        assert_eq!(greeks, expected);
    }

    #[test]
    fn model_needs_a_spot_quote_and_an_open_option() {
        let model = GreeksModel::new(0.25, 0.0).as_of(NaiveDate::from_ymd_opt(2025, 6, 19).unwrap());

        let unquoted = LegMap::from([
            (ContractId::new(1), leg(1, OptionRight::Call, dec!(100), dec!(1))),
            (ContractId::new(9), quoted_stock(None)),
        ]);
        assert_eq!(model.evaluate("XYZ", &unquoted).unwrap(), None);

        let stock_only = LegMap::from([(ContractId::new(9), quoted_stock(Some(dec!(100))))]);
        assert_eq!(model.evaluate("XYZ", &stock_only).unwrap(), None);
    }
}
