//! Statement Event Value Object
//!
//! Statements are append-only ledger rows. Corrections arrive as new rows; a
//! statement is never mutated apart from its later association with a trade.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::shared::{ContractId, StatementId, TradeId};

/// Discriminant of a statement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Stock fill (including assignment deliveries).
    EquityTrade,
    /// Option fill, assignment or expiry.
    OptionTrade,
    /// Bond fill.
    BondTrade,
    /// Split, merger or other corporate action moving shares.
    CorporateAction,
    /// Dividend payment.
    Dividend,
    /// Tax charge.
    Tax,
    /// Interest credit or debit.
    Interest,
    /// Withholding tax on a dividend.
    WithHolding,
    /// Commission or other fee.
    Fee,
    /// Cash transfer.
    Cash,
    /// Sales tax on fees.
    SalesTax,
}

impl StatementKind {
    /// Whether rows of this kind move a leg's quantity.
    #[must_use]
    pub const fn is_trade(self) -> bool {
        matches!(
            self,
            Self::EquityTrade | Self::OptionTrade | Self::BondTrade | Self::CorporateAction
        )
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EquityTrade => "EquityTrade",
            Self::OptionTrade => "OptionTrade",
            Self::BondTrade => "BondTrade",
            Self::CorporateAction => "CorporateAction",
            Self::Dividend => "Dividend",
            Self::Tax => "Tax",
            Self::Interest => "Interest",
            Self::WithHolding => "WithHolding",
            Self::Fee => "Fee",
            Self::Cash => "Cash",
            Self::SalesTax => "SalesTax",
        };
        write!(f, "{name}")
    }
}

/// Payload of a quantity-moving statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Contract whose leg moves.
    pub contract_id: ContractId,
    /// Signed quantity (positive = bought).
    pub quantity: Decimal,
    /// Execution price per unit.
    #[serde(default)]
    pub price: Decimal,
    /// PnL realized by this fill, as reported by the broker.
    #[serde(default)]
    pub realized_pnl: Decimal,
}

/// Payload of a statement that only moves cash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashFlow {
    /// Related contract (e.g. the stock paying a dividend).
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    /// Free-form description from the broker.
    #[serde(default)]
    pub description: String,
}

/// Kind-specific payload of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementDetail {
    /// Stock fill.
    EquityTrade(Fill),
    /// Option fill.
    OptionTrade(Fill),
    /// Bond fill.
    BondTrade(Fill),
    /// Corporate action.
    CorporateAction(Fill),
    /// Dividend.
    Dividend(CashFlow),
    /// Tax.
    Tax(CashFlow),
    /// Interest.
    Interest(CashFlow),
    /// Withholding.
    WithHolding(CashFlow),
    /// Fee.
    Fee(CashFlow),
    /// Cash transfer.
    Cash(CashFlow),
    /// Sales tax.
    SalesTax(CashFlow),
}

impl StatementDetail {
    /// Get the discriminant.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::EquityTrade(_) => StatementKind::EquityTrade,
            Self::OptionTrade(_) => StatementKind::OptionTrade,
            Self::BondTrade(_) => StatementKind::BondTrade,
            Self::CorporateAction(_) => StatementKind::CorporateAction,
            Self::Dividend(_) => StatementKind::Dividend,
            Self::Tax(_) => StatementKind::Tax,
            Self::Interest(_) => StatementKind::Interest,
            Self::WithHolding(_) => StatementKind::WithHolding,
            Self::Fee(_) => StatementKind::Fee,
            Self::Cash(_) => StatementKind::Cash,
            Self::SalesTax(_) => StatementKind::SalesTax,
        }
    }

    /// Get the fill payload for trade kinds.
    #[must_use]
    pub const fn fill(&self) -> Option<&Fill> {
        match self {
            Self::EquityTrade(fill)
            | Self::OptionTrade(fill)
            | Self::BondTrade(fill)
            | Self::CorporateAction(fill) => Some(fill),
            Self::Dividend(_)
            | Self::Tax(_)
            | Self::Interest(_)
            | Self::WithHolding(_)
            | Self::Fee(_)
            | Self::Cash(_)
            | Self::SalesTax(_) => None,
        }
    }

    /// Get the cash-flow payload for non-trade kinds.
    #[must_use]
    pub const fn cash_flow(&self) -> Option<&CashFlow> {
        match self {
            Self::Dividend(flow)
            | Self::Tax(flow)
            | Self::Interest(flow)
            | Self::WithHolding(flow)
            | Self::Fee(flow)
            | Self::Cash(flow)
            | Self::SalesTax(flow) => Some(flow),
            Self::EquityTrade(_)
            | Self::OptionTrade(_)
            | Self::BondTrade(_)
            | Self::CorporateAction(_) => None,
        }
    }
}

/// One immutable ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementEvent {
    /// Row id.
    pub id: StatementId,
    /// Execution or booking time.
    pub date: DateTime<Utc>,
    /// Arrival order, breaks ties between rows with the same date.
    #[serde(default)]
    pub sequence: u64,
    /// Trade this row has been associated with.
    #[serde(default)]
    pub trade_id: Option<TradeId>,
    /// Currency of `net_cash`.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Conversion rate from `currency` to the base currency.
    #[serde(default = "default_fx_rate")]
    pub fx_rate_to_base: Decimal,
    /// Signed cash movement (negative = paid).
    pub net_cash: Decimal,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub detail: StatementDetail,
}

fn default_currency() -> String {
    "USD".to_string()
}

const fn default_fx_rate() -> Decimal {
    Decimal::ONE
}

impl StatementEvent {
    /// Get the statement kind.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.detail.kind()
    }

    /// Signed quantity moved by this row (zero for non-trade kinds).
    #[must_use]
    pub fn quantity_delta(&self) -> Decimal {
        self.detail.fill().map_or(Decimal::ZERO, |f| f.quantity)
    }

    /// Broker-reported realized PnL (zero for non-trade kinds).
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.detail.fill().map_or(Decimal::ZERO, |f| f.realized_pnl)
    }

    /// Contract referenced by this row, if any.
    #[must_use]
    pub fn contract_id(&self) -> Option<ContractId> {
        match &self.detail {
            detail if detail.fill().is_some() => detail.fill().map(|f| f.contract_id),
            detail => detail.cash_flow().and_then(|c| c.contract_id),
        }
    }

    /// Contribution of this row to the trade's PnL in its own currency.
    ///
    /// Fills contribute their realized PnL, every other kind its net cash.
    #[must_use]
    pub fn pnl_contribution(&self) -> Decimal {
        match self.detail.fill() {
            Some(fill) => fill.realized_pnl,
            None => self.net_cash,
        }
    }

    /// Ledger ordering: by date, then arrival order, then id.
    #[must_use]
    pub fn ledger_order(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.sequence.cmp(&other.sequence))
            .then(self.id.cmp(&other.id))
    }
}

/// Sort statements into ledger order without mutating the caller's slice.
#[must_use]
pub fn sorted_by_ledger_order(events: &[StatementEvent]) -> Vec<StatementEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(StatementEvent::ledger_order);
    sorted
}
