//! Combo Risk Analyzer
//!
//! The settlement payoff of a basket of stock and European option legs is a
//! continuous piecewise-linear function of the terminal underlying price `P`.
//! Its minimum over `P >= 0` is therefore reached at `P = 0`, at a kink (an
//! option strike or a stock or bond leg's cost per unit), or towards infinity, which
//! is approximated by twice the largest kink. Only that finite candidate set is
//! evaluated.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{LegMap, OptionRight, SecType, VirtualLeg};

use super::errors::RiskError;

/// Default bond lot size used to scale bond legs.
pub const DEFAULT_BOND_LOT_SIZE: Decimal = Decimal::ONE_THOUSAND;

/// Worst-case settlement risk of a combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboRisk {
    /// Cash already committed to the open legs (`-Σ cost_basis`).
    pub cash_risk: Decimal,
    /// Lowest settlement payoff across candidate prices, capped at zero.
    pub options_risk: Decimal,
    /// `cash_risk + options_risk`. More negative means riskier.
    pub total: Decimal,
}

impl ComboRisk {
    /// Risk of an empty combo.
    pub const ZERO: Self = Self {
        cash_risk: Decimal::ZERO,
        options_risk: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Settlement payoff at one candidate underlying price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Terminal underlying price.
    pub price: Decimal,
    /// Payoff of all open legs at that price.
    pub payoff: Decimal,
}

/// Computes worst-case combo risk from a leg snapshot.
#[derive(Debug, Clone)]
pub struct ComboRiskAnalyzer {
    bond_lot_size: Decimal,
}

impl Default for ComboRiskAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_BOND_LOT_SIZE)
    }
}

impl ComboRiskAnalyzer {
    /// Create an analyzer with the given bond lot size.
    ///
    /// A non-positive lot size falls back to the default.
    #[must_use]
    pub fn new(bond_lot_size: Decimal) -> Self {
        let bond_lot_size = if bond_lot_size > Decimal::ZERO {
            bond_lot_size
        } else {
            DEFAULT_BOND_LOT_SIZE
        };
        Self { bond_lot_size }
    }

    /// Get the bond lot size.
    #[must_use]
    pub const fn bond_lot_size(&self) -> Decimal {
        self.bond_lot_size
    }

    /// Worst-case risk of the open legs.
    pub fn worst_case_risk(&self, legs: &LegMap) -> Result<ComboRisk, RiskError> {
        let open = open_legs(legs)?;

        let cash_risk = -open.iter().map(|leg| leg.cost_basis).sum::<Decimal>();
        let worst = self
            .scenarios_for(&open)
            .into_iter()
            .map(|scenario| scenario.payoff)
            .min()
            .unwrap_or(Decimal::ZERO);
        let options_risk = worst.min(Decimal::ZERO);

        Ok(ComboRisk {
            cash_risk,
            options_risk,
            total: cash_risk + options_risk,
        })
    }

    /// Candidate prices and the payoff of the open legs at each, ascending by price.
    pub fn scenarios(&self, legs: &LegMap) -> Result<Vec<Scenario>, RiskError> {
        let open = open_legs(legs)?;
        Ok(self.scenarios_for(&open))
    }

    fn scenarios_for(&self, open: &[&VirtualLeg]) -> Vec<Scenario> {
        self.candidate_prices(open)
            .into_iter()
            .map(|price| Scenario {
                price,
                payoff: open.iter().map(|leg| self.leg_payoff(leg, price)).sum(),
            })
            .collect()
    }

    fn leg_payoff(&self, leg: &VirtualLeg, price: Decimal) -> Decimal {
        let contract = &leg.contract;
        match contract.option_terms() {
            Some(terms) => {
                let multiplier = Decimal::from(terms.multiplier);
                match terms.right {
                    OptionRight::Put if price <= terms.strike => {
                        (terms.strike - price) * leg.quantity * multiplier
                    }
                    OptionRight::Call if price >= terms.strike => {
                        (price - terms.strike) * leg.quantity * multiplier
                    }
                    _ => Decimal::ZERO,
                }
            }
            None => price * self.payoff_units(leg),
        }
    }

    /// Units a stock or bond leg is quoted in: shares, or bond lots.
    fn payoff_units(&self, leg: &VirtualLeg) -> Decimal {
        if leg.contract.sec_type() == SecType::Bond {
            leg.quantity / self.bond_lot_size
        } else {
            leg.quantity
        }
    }

    /// `{0} ∪ {stock or bond cost per unit} ∪ {strikes}` plus twice the largest.
    ///
    /// Bond costs are taken per lot so they share units with `leg_payoff`.
    /// Negative costs per unit (a leg carried at a credit against its direction)
    /// lie outside the price domain and are skipped.
    fn candidate_prices(&self, open: &[&VirtualLeg]) -> BTreeSet<Decimal> {
        let mut candidates = BTreeSet::from([Decimal::ZERO]);
        for leg in open {
            match (leg.contract.sec_type(), leg.contract.strike()) {
                (_, Some(strike)) => {
                    candidates.insert(strike);
                }
                (SecType::Stock | SecType::Bond, None) => {
                    let per_unit = leg.cost_basis / self.payoff_units(leg);
                    if per_unit >= Decimal::ZERO {
                        candidates.insert(per_unit);
                    }
                }
                _ => {}
            }
        }
        if let Some(max) = candidates.last().copied() {
            candidates.insert(max * Decimal::TWO);
        }
        candidates
    }
}

/// Open legs, rejecting security types without a payoff model.
fn open_legs(legs: &LegMap) -> Result<Vec<&VirtualLeg>, RiskError> {
    let open: Vec<&VirtualLeg> = legs.values().filter(|leg| leg.is_open()).collect();
    for leg in &open {
        let sec_type = leg.contract.sec_type();
        if matches!(sec_type, SecType::Future | SecType::Cash) {
            return Err(RiskError::UnsupportedLegType {
                contract_id: leg.contract.id(),
                sec_type,
            });
        }
    }
    Ok(open)
}
