//! Recomputation output.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{LegMap, VirtualLeg};
use crate::domain::risk::ComboRisk;
use crate::domain::shared::TradeId;
use crate::domain::strategy::Strategy;

use super::aggregate::TradeStatus;

/// How a recomputation treats a trade whose legs are all flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeMode {
    /// Refresh the summary; flat trades stay open unless already closed.
    #[default]
    Refresh,
    /// Close the trade if all legs are flat.
    Close,
}

/// Summary produced by one recomputation of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSummary {
    /// Trade recomputed.
    pub trade_id: TradeId,
    /// Lifecycle status.
    pub status: TradeStatus,
    /// Classified or refined strategy.
    pub strategy: Strategy,
    /// Date of the first statement.
    pub opening_date: Option<DateTime<Utc>>,
    /// Date of the last fill, once closed.
    pub closing_date: Option<DateTime<Utc>>,
    /// Worst risk observed at any adjustment window end (never positive).
    pub risk: Decimal,
    /// Realized PnL in the trade currency.
    pub realized_pnl: Decimal,
    /// Realized PnL in the base currency.
    pub realized_pnl_base: Decimal,
    /// PnL if every open leg expires worthless.
    pub expiry_pnl: Decimal,
    /// Latest expiry among open option legs.
    pub expected_expiry: Option<NaiveDate>,
    /// Combo risk of the final legs.
    pub combo_risk: ComboRisk,
    /// Number of adjustment windows replayed.
    pub windows: usize,
    /// Final legs, including flat ones.
    pub legs: LegMap,
}

impl TradeSummary {
    /// Legs that still hold a position.
    pub fn open_legs(&self) -> impl Iterator<Item = &VirtualLeg> {
        self.legs.values().filter(|leg| leg.is_open())
    }
}
