//! Virtual Leg Value Object
//!
//! A leg is one contract's running position inside a trade, derived from the
//! ledger and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contract::ContractDescriptor;

/// Running position of one contract within a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualLeg {
    /// Contract held by the leg.
    pub contract: ContractDescriptor,
    /// Signed quantity (positive = long).
    pub quantity: Decimal,
    /// Cash committed to the open quantity (positive = paid).
    pub cost_basis: Decimal,
    /// PnL realized by fills on this leg.
    pub realized_pnl: Decimal,
    /// Cost per unit, multiplier-aware. Zero when flat.
    pub pru: Decimal,
    /// Last observed quote, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl VirtualLeg {
    /// Create a flat leg for a contract.
    #[must_use]
    pub const fn new(contract: ContractDescriptor) -> Self {
        Self {
            contract,
            quantity: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            pru: Decimal::ZERO,
            price: None,
        }
    }

    /// Whether the leg still holds a position.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.quantity.is_zero()
    }

    /// Whether the leg is long.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.quantity.is_sign_positive() && self.is_open()
    }

    /// Whether the leg is short.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.quantity.is_sign_negative() && self.is_open()
    }

    /// Apply a fill: `quantity` moves the position, `net_cash` is the signed
    /// cash movement of the fill (negative = paid).
    pub fn apply_fill(&mut self, quantity: Decimal, net_cash: Decimal, realized_pnl: Decimal) {
        self.quantity += quantity;
        self.cost_basis -= net_cash;
        self.realized_pnl += realized_pnl;

        if self.quantity.is_zero() {
            self.cost_basis = Decimal::ZERO;
            self.pru = Decimal::ZERO;
        } else {
            let multiplier = Decimal::from(self.contract.multiplier());
            self.pru = self.cost_basis / self.quantity / multiplier;
        }
    }

    /// Market value at the last observed quote, if any.
    #[must_use]
    pub fn market_value(&self) -> Option<Decimal> {
        self.price
            .map(|price| price * self.quantity * Decimal::from(self.contract.multiplier()))
    }
}
