//! Strategy Classifier
//!
//! Derives a [`Strategy`] from open legs by summing absolute quantities into
//! buckets and walking a fixed decision table. Classification only sets a
//! strategy that is still undefined; afterwards [`StrategyClassifier::refine`]
//! may only upgrade known transitions.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::ledger::{LegMap, OptionRight, SecType};

use super::errors::StrategyError;
use super::kind::Strategy;

/// Absolute quantity sums and strike extremes over open legs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegBuckets {
    /// Long shares.
    pub long_stock: Decimal,
    /// Short shares.
    pub short_stock: Decimal,
    /// Long call contracts.
    pub long_call: Decimal,
    /// Short call contracts.
    pub short_call: Decimal,
    /// Long put contracts.
    pub long_put: Decimal,
    /// Short put contracts.
    pub short_put: Decimal,
    /// Long bonds.
    pub long_bond: Decimal,
    /// Cost basis of long stock legs.
    pub stocks_cost: Decimal,
    lowest_short_call: Option<Decimal>,
    lowest_long_call: Option<Decimal>,
    highest_short_put: Option<Decimal>,
    highest_long_put: Option<Decimal>,
}

impl LegBuckets {
    /// Bucket the open legs.
    pub fn from_legs(legs: &LegMap) -> Result<Self, StrategyError> {
        let mut buckets = Self::default();

        for leg in legs.values().filter(|leg| leg.is_open()) {
            let contract = &leg.contract;
            let size = leg.quantity.abs();
            let long = leg.is_long();

            match (contract.sec_type(), contract.option_terms()) {
                (SecType::Stock, _) if long => {
                    buckets.long_stock += size;
                    buckets.stocks_cost += leg.cost_basis;
                }
                (SecType::Stock, _) => buckets.short_stock += size,
                (SecType::Bond, _) if long => buckets.long_bond += size,
                // Short bonds have no bucket.
                (SecType::Bond, _) => {}
                (SecType::Option | SecType::FutureOption, Some(terms)) => {
                    let strike = terms.strike;
                    match (terms.right, long) {
                        (OptionRight::Call, true) => {
                            buckets.long_call += size;
                            buckets.lowest_long_call = lowest(buckets.lowest_long_call, strike);
                        }
                        (OptionRight::Call, false) => {
                            buckets.short_call += size;
                            buckets.lowest_short_call = lowest(buckets.lowest_short_call, strike);
                        }
                        (OptionRight::Put, true) => {
                            buckets.long_put += size;
                            buckets.highest_long_put = highest(buckets.highest_long_put, strike);
                        }
                        (OptionRight::Put, false) => {
                            buckets.short_put += size;
                            buckets.highest_short_put = highest(buckets.highest_short_put, strike);
                        }
                    }
                }
                (sec_type, _) => {
                    return Err(StrategyError::UnsupportedLegType {
                        contract_id: contract.id(),
                        sec_type,
                    });
                }
            }
        }

        Ok(buckets)
    }

    /// Whether no bucket holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            self.long_stock,
            self.short_stock,
            self.long_call,
            self.short_call,
            self.long_put,
            self.short_put,
            self.long_bond,
        ]
        .iter()
        .all(Decimal::is_zero)
    }

    /// Average cost per long share, if any are held.
    #[must_use]
    pub fn average_stock_cost(&self) -> Option<Decimal> {
        (!self.long_stock.is_zero()).then(|| self.stocks_cost / self.long_stock)
    }

    fn has_calls(&self) -> bool {
        !self.long_call.is_zero() || !self.short_call.is_zero()
    }

    fn has_puts(&self) -> bool {
        !self.long_put.is_zero() || !self.short_put.is_zero()
    }
}

fn lowest(current: Option<Decimal>, strike: Decimal) -> Option<Decimal> {
    Some(current.map_or(strike, |c| c.min(strike)))
}

fn highest(current: Option<Decimal>, strike: Decimal) -> Option<Decimal> {
    Some(current.map_or(strike, |c| c.max(strike)))
}

/// Stateless classifier over leg snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyClassifier;

impl StrategyClassifier {
    /// Create a classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classify open legs. `None` means no rule matched and the trade stays undefined.
    pub fn classify(&self, legs: &LegMap) -> Result<Option<Strategy>, StrategyError> {
        let buckets = LegBuckets::from_legs(legs)?;
        if buckets.is_empty() {
            warn!(legs = legs.len(), "No open legs to classify");
            return Ok(None);
        }
        Ok(decide(&buckets))
    }

    /// Refine an existing strategy.
    ///
    /// A short put or risk reversal that gains long stock and a short call
    /// becomes [`Strategy::TheWheel`]. Other defined strategies are returned
    /// unchanged; an undefined one is classified.
    pub fn refine(&self, existing: Strategy, legs: &LegMap) -> Result<Strategy, StrategyError> {
        if !existing.is_defined() {
            return Ok(self.classify(legs)?.unwrap_or_default());
        }

        let buckets = LegBuckets::from_legs(legs)?;
        let wheel = existing.is_wheel_candidate()
            && !buckets.long_stock.is_zero()
            && !buckets.short_call.is_zero();
        Ok(if wheel { Strategy::TheWheel } else { existing })
    }
}

/// Decision table, first match wins.
fn decide(b: &LegBuckets) -> Option<Strategy> {
    let zero = Decimal::ZERO;

    if b.long_bond > zero {
        return Some(Strategy::LongBond);
    }

    if b.long_stock > zero {
        if b.short_call > zero {
            let below_cost = match (b.lowest_short_call, b.average_stock_cost()) {
                (Some(strike), Some(average)) => strike < average,
                _ => false,
            };
            return Some(if below_cost {
                Strategy::BuyWrite
            } else {
                Strategy::CoveredShortCall
            });
        }
        return Some(Strategy::LongStock);
    }

    if b.short_stock > zero {
        return Some(Strategy::ShortStock);
    }

    let calls = b.has_calls();
    let puts = b.has_puts();

    if b.short_put > b.long_put && b.long_put > zero && !calls {
        return Some(Strategy::FrontRatioSpread);
    }
    if b.long_call > zero && b.short_call > b.long_call && !puts {
        return Some(Strategy::FrontRatioSpread);
    }
    if b.short_put > zero && b.long_put.is_zero() && !calls {
        return Some(Strategy::ShortPut);
    }
    if b.long_put > zero && b.short_put.is_zero() && !calls {
        return Some(Strategy::LongPut);
    }
    if b.short_call > zero && b.long_call.is_zero() && !puts {
        return Some(Strategy::NakedShortCall);
    }
    if b.long_call > zero && b.short_call.is_zero() && !puts {
        return Some(Strategy::LongCall);
    }
    if b.long_call > zero && b.short_put > zero && b.long_put.is_zero() && b.short_call.is_zero() {
        return Some(Strategy::RiskReversal);
    }
    if b.short_call > zero && b.short_put > zero && b.long_call.is_zero() && b.long_put.is_zero() {
        return Some(Strategy::ShortStrangle);
    }
    if b.long_call > zero && b.long_put > zero && b.short_call.is_zero() && b.short_put.is_zero() {
        return Some(Strategy::LongStrangle);
    }
    if b.short_call == b.long_call && b.short_put == b.long_put && b.long_call == b.long_put {
        return Some(Strategy::IronCondor);
    }
    if b.short_call == b.long_call && !puts {
        let bearish = match (b.lowest_short_call, b.lowest_long_call) {
            (Some(short), Some(long)) => short < long,
            _ => false,
        };
        return Some(if bearish {
            Strategy::BearSpread
        } else {
            Strategy::BullSpread
        });
    }
    if b.short_put == b.long_put && !calls {
        let bullish = match (b.highest_short_put, b.highest_long_put) {
            (Some(short), Some(long)) => short > long,
            _ => false,
        };
        return Some(if bullish {
            Strategy::BullSpread
        } else {
            Strategy::BearSpread
        });
    }

    None
}
