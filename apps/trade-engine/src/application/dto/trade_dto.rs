//! Trade DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{OptionRight, SecType, VirtualLeg};
use crate::domain::risk::ComboRisk;
use crate::domain::shared::{ContractId, TradeId};
use crate::domain::strategy::Strategy;
use crate::domain::trade::{Trade, TradeStatus, TradeSummary};
use crate::error::ErrorReport;
use crate::pricing::Greeks;

/// DTO for one leg of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualPositionDto {
    /// Contract id.
    pub contract_id: ContractId,
    /// Contract symbol.
    pub symbol: String,
    /// Security type.
    pub sec_type: SecType,
    /// Option right (options only).
    pub right: Option<OptionRight>,
    /// Option strike (options only).
    pub strike: Option<Decimal>,
    /// Option expiry (options only).
    pub expiry: Option<NaiveDate>,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Cash committed to the open quantity.
    pub cost_basis: Decimal,
    /// Cost per unit.
    pub pru: Decimal,
    /// Realized PnL of the leg.
    pub realized_pnl: Decimal,
    /// Last quote.
    pub price: Option<Decimal>,
    /// Value at the last quote.
    pub market_value: Option<Decimal>,
    /// `market_value - cost_basis`, when quoted.
    pub unrealized_pnl: Option<Decimal>,
}

impl From<&VirtualLeg> for VirtualPositionDto {
    fn from(leg: &VirtualLeg) -> Self {
        let market_value = leg.market_value();
        Self {
            contract_id: leg.contract.id(),
            symbol: leg.contract.symbol().to_string(),
            sec_type: leg.contract.sec_type(),
            right: leg.contract.right(),
            strike: leg.contract.strike(),
            expiry: leg.contract.expiry(),
            quantity: leg.quantity,
            cost_basis: leg.cost_basis,
            pru: leg.pru,
            realized_pnl: leg.realized_pnl,
            price: leg.price,
            market_value,
            unrealized_pnl: market_value.map(|value| value - leg.cost_basis),
        }
    }
}

/// DTO for a recomputed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummaryDto {
    /// Trade id.
    pub trade_id: TradeId,
    /// Underlying label.
    pub symbol: String,
    /// Trade currency.
    pub currency: String,
    /// Lifecycle status.
    pub status: TradeStatus,
    /// Strategy tag.
    pub strategy: Strategy,
    /// Date of the first statement.
    pub opening_date: Option<DateTime<Utc>>,
    /// Closing date.
    pub closing_date: Option<DateTime<Utc>>,
    /// Worst observed risk.
    pub risk: Decimal,
    /// Realized PnL in the trade currency.
    pub realized_pnl: Decimal,
    /// Realized PnL in the base currency.
    pub realized_pnl_base: Decimal,
    /// PnL if open legs expire worthless.
    pub expiry_pnl: Decimal,
    /// Latest expiry among open option legs.
    pub expected_expiry: Option<NaiveDate>,
    /// Combo risk of the current legs.
    pub combo_risk: ComboRisk,
    /// Number of adjustment windows.
    pub windows: usize,
    /// Every leg, flat ones included.
    pub positions: Vec<VirtualPositionDto>,
    /// Aggregate Greeks of the open option legs, when priced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeks: Option<Greeks>,
}

impl TradeSummaryDto {
    /// Build from a trade that already had `summary` applied.
    #[must_use]
    pub fn from_summary(trade: &Trade, summary: &TradeSummary) -> Self {
        Self {
            trade_id: trade.id,
            symbol: trade.symbol.clone(),
            currency: trade.currency.clone(),
            status: summary.status,
            strategy: summary.strategy,
            opening_date: summary.opening_date,
            closing_date: summary.closing_date,
            risk: summary.risk,
            realized_pnl: summary.realized_pnl,
            realized_pnl_base: summary.realized_pnl_base,
            expiry_pnl: summary.expiry_pnl,
            expected_expiry: summary.expected_expiry,
            combo_risk: summary.combo_risk,
            windows: summary.windows,
            positions: summary.legs.values().map(VirtualPositionDto::from).collect(),
            greeks: None,
        }
    }

    /// Attach position Greeks.
    #[must_use]
    pub const fn with_greeks(mut self, greeks: Option<Greeks>) -> Self {
        self.greeks = greeks;
        self
    }

    /// Open positions only.
    pub fn open_positions(&self) -> impl Iterator<Item = &VirtualPositionDto> {
        self.positions.iter().filter(|p| !p.quantity.is_zero())
    }
}

/// DTO for a trade whose recomputation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeFailureDto {
    /// Trade id.
    pub trade_id: TradeId,
    /// Failure details.
    pub error: ErrorReport,
}

/// Outcome of recomputing every trade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecomputeReport {
    /// Successfully recomputed trades.
    pub updated: Vec<TradeSummaryDto>,
    /// Trades left flagged for retry.
    pub failed: Vec<RecomputeFailureDto>,
}

impl RecomputeReport {
    /// Whether every trade recomputed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
