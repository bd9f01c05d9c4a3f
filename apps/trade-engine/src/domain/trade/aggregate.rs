//! Trade Aggregate
//!
//! A trade groups the statements that make up one combo. Its summary fields are
//! always derived from those statements by recomputation; the aggregate only
//! holds the last successful result and a retry flag.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::TradeId;
use crate::domain::strategy::Strategy;

use super::summary::TradeSummary;

/// Trade lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    /// No fills seen yet.
    #[default]
    Undefined,
    /// At least one leg has been opened.
    Open,
    /// All legs flat and closed on request.
    Closed,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Trade aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade id.
    pub id: TradeId,
    /// Underlying label.
    pub symbol: String,
    /// Trade currency.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: TradeStatus,
    /// Strategy tag, only ever refined.
    #[serde(default)]
    pub strategy: Strategy,
    /// Date of the first statement.
    #[serde(default)]
    pub opening_date: Option<DateTime<Utc>>,
    /// Date of the closing fill.
    #[serde(default)]
    pub closing_date: Option<DateTime<Utc>>,
    /// Worst observed combo risk (never positive).
    #[serde(default)]
    pub risk: Decimal,
    /// Realized PnL in the trade currency.
    #[serde(default)]
    pub realized_pnl: Decimal,
    /// Realized PnL in the base currency.
    #[serde(default)]
    pub realized_pnl_base: Decimal,
    /// PnL if open legs expire worthless.
    #[serde(default)]
    pub expiry_pnl: Decimal,
    /// Latest expiry among open option legs.
    #[serde(default)]
    pub expected_expiry: Option<NaiveDate>,
    /// Free-form note.
    #[serde(default)]
    pub comment: String,
    /// Set when the last recomputation failed.
    #[serde(default)]
    pub needs_recompute: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Trade {
    /// Create an empty trade.
    #[must_use]
    pub fn new(id: TradeId, symbol: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            currency: currency.into(),
            status: TradeStatus::Undefined,
            strategy: Strategy::Undefined,
            opening_date: None,
            closing_date: None,
            risk: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            realized_pnl_base: Decimal::ZERO,
            expiry_pnl: Decimal::ZERO,
            expected_expiry: None,
            comment: String::new(),
            needs_recompute: false,
        }
    }

    /// Copy a successful recomputation onto the trade and clear the retry flag.
    pub fn apply_summary(&mut self, summary: &TradeSummary) {
        self.status = summary.status;
        self.strategy = summary.strategy;
        self.opening_date = summary.opening_date;
        self.closing_date = summary.closing_date;
        self.risk = summary.risk;
        self.realized_pnl = summary.realized_pnl;
        self.realized_pnl_base = summary.realized_pnl_base;
        self.expiry_pnl = summary.expiry_pnl;
        self.expected_expiry = summary.expected_expiry;
        self.needs_recompute = false;
    }

    /// Flag the trade for retry, keeping the last-known-good summary.
    pub fn mark_failed(&mut self) {
        self.needs_recompute = true;
    }

    /// Whether the trade is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }
}
