//! Trade Aggregator
//!
//! Recomputes a trade from scratch: replays its statements window by window,
//! samples combo risk at each window end, classifies or refines the strategy
//! and derives the lifecycle status.
//!
//! Risk starts at zero on every recomputation and is the running minimum of
//! `pnl_so_far + combo_risk` across the windows of that pass. Each pass replays
//! the full history, so the result is a pure function of the statement set.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::domain::ledger::{
    ContractDescriptor, LedgerReplay, StatementEvent, sorted_by_ledger_order,
};
use crate::domain::risk::ComboRiskAnalyzer;
use crate::domain::shared::ContractId;
use crate::domain::strategy::StrategyClassifier;

use super::aggregate::{Trade, TradeStatus};
use super::errors::TradeError;
use super::summary::{RecomputeMode, TradeSummary};
use super::windows::{DEFAULT_ADJUSTMENT_WINDOW_MINUTES, adjustment_windows};

/// Orchestrates replay, risk and classification for one trade.
#[derive(Debug, Clone)]
pub struct TradeAggregator {
    adjustment_window: Duration,
    analyzer: ComboRiskAnalyzer,
    classifier: StrategyClassifier,
}

impl Default for TradeAggregator {
    fn default() -> Self {
        Self::new(
            Duration::minutes(DEFAULT_ADJUSTMENT_WINDOW_MINUTES),
            ComboRiskAnalyzer::default(),
        )
    }
}

impl TradeAggregator {
    /// Create an aggregator.
    #[must_use]
    pub const fn new(adjustment_window: Duration, analyzer: ComboRiskAnalyzer) -> Self {
        Self {
            adjustment_window,
            analyzer,
            classifier: StrategyClassifier::new(),
        }
    }

    /// Recompute a trade's summary from its statements.
    ///
    /// `quotes` only fill the legs' display price.
    #[instrument(skip_all, fields(trade_id = %trade.id, statements = statements.len(), mode = ?mode))]
    pub fn recompute(
        &self,
        trade: &Trade,
        statements: &[StatementEvent],
        contracts: &HashMap<ContractId, ContractDescriptor>,
        quotes: &HashMap<ContractId, Decimal>,
        mode: RecomputeMode,
    ) -> Result<TradeSummary, TradeError> {
        if let Some(found) = statements
            .iter()
            .filter_map(|s| s.trade_id)
            .find(|id| *id != trade.id)
        {
            return Err(TradeError::ForeignStatement {
                expected: trade.id,
                found,
            });
        }

        let sorted = sorted_by_ledger_order(statements);
        let windows = adjustment_windows(&sorted, self.adjustment_window);

        let mut replay = LedgerReplay::new(contracts);
        let mut strategy = trade.strategy;
        let mut risk = Decimal::ZERO;

        for (index, window) in windows.iter().enumerate() {
            for event in *window {
                replay.apply(event)?;
            }
            strategy = self.classifier.refine(strategy, replay.legs())?;
            let combo = self.analyzer.worst_case_risk(replay.legs())?;
            risk = risk.min(replay.pnl_so_far() + combo.total);
            debug!(
                window = index,
                events = window.len(),
                %strategy,
                combo = %combo.total,
                %risk,
                "Adjustment window replayed"
            );
        }

        let combo_risk = self.analyzer.worst_case_risk(replay.legs())?;
        let fills_seen = replay.fill_count() > 0;
        let mut legs = replay.into_legs();
        for (contract_id, leg) in &mut legs {
            leg.price = quotes.get(contract_id).copied();
        }

        let open: Vec<_> = legs.values().filter(|leg| leg.is_open()).collect();
        let expiry_pnl = -open.iter().map(|leg| leg.cost_basis).sum::<Decimal>();
        let expected_expiry: Option<NaiveDate> =
            open.iter().filter_map(|leg| leg.contract.expiry()).max();
        let any_open = !open.is_empty();

        let realized_pnl: Decimal = sorted.iter().map(StatementEvent::pnl_contribution).sum();
        let realized_pnl_base: Decimal = sorted
            .iter()
            .map(|s| s.pnl_contribution() * s.fx_rate_to_base)
            .sum();

        let (status, closing_date) = if any_open {
            (TradeStatus::Open, None)
        } else if fills_seen
            && (mode == RecomputeMode::Close || trade.status == TradeStatus::Closed)
        {
            let closing = trade.closing_date.or_else(|| last_fill_date(&sorted));
            (TradeStatus::Closed, closing)
        } else if fills_seen {
            (TradeStatus::Open, None)
        } else {
            (TradeStatus::Undefined, None)
        };

        let summary = TradeSummary {
            trade_id: trade.id,
            status,
            strategy,
            opening_date: sorted.first().map(|s| s.date).or(trade.opening_date),
            closing_date,
            risk,
            realized_pnl,
            realized_pnl_base,
            expiry_pnl,
            expected_expiry,
            combo_risk,
            windows: windows.len(),
            legs,
        };

        debug!(
            status = %summary.status,
            strategy = %summary.strategy,
            risk = %summary.risk,
            "Trade recomputed"
        );
        Ok(summary)
    }
}

fn last_fill_date(sorted: &[StatementEvent]) -> Option<DateTime<Utc>> {
    sorted
        .iter()
        .rev()
        .find(|s| s.kind().is_trade())
        .map(|s| s.date)
}
