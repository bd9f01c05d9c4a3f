//! Recompute All Trades Use Case
//!
//! Loads every trade, recomputes them in parallel, then saves each outcome.
//! A failure on one trade is reported and never aborts the others.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::application::dto::{RecomputeFailureDto, RecomputeReport};
use crate::application::ports::{
    ContractRepositoryPort, QuoteProviderPort, StatementRepositoryPort, TradeRepositoryPort,
};
use crate::domain::trade::{RecomputeMode, TradeAggregator};
use crate::error::EngineError;
use crate::pricing::GreeksModel;

use super::ledger_ports::{LedgerPorts, TradeInputs, summary_greeks};

/// Use case for refreshing every stored trade.
pub struct RecomputeAllTradesUseCase<S, C, T, Q> {
    ports: LedgerPorts<S, C, T, Q>,
    aggregator: TradeAggregator,
    greeks: Option<GreeksModel>,
}

impl<S, C, T, Q> RecomputeAllTradesUseCase<S, C, T, Q>
where
    S: StatementRepositoryPort,
    C: ContractRepositoryPort,
    T: TradeRepositoryPort,
    Q: QuoteProviderPort,
{
    /// Create a new `RecomputeAllTradesUseCase`.
    pub const fn new(ports: LedgerPorts<S, C, T, Q>, aggregator: TradeAggregator) -> Self {
        Self {
            ports,
            aggregator,
            greeks: None,
        }
    }

    /// Attach position Greeks to each summary using `model`.
    #[must_use]
    pub const fn with_greeks(mut self, model: GreeksModel) -> Self {
        self.greeks = Some(model);
        self
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Only fails when the trade list itself cannot be read.
    pub async fn execute(&self) -> Result<RecomputeReport, EngineError> {
        let ids = self.ports.trade_ids().await?;
        let mut report = RecomputeReport::default();

        let mut loaded: Vec<TradeInputs> = Vec::with_capacity(ids.len());
        for trade_id in ids {
            match self.ports.load(trade_id).await {
                Ok(inputs) => loaded.push(inputs),
                Err(err) => {
                    warn!(trade_id = %trade_id, error = %err, "Failed to load trade");
                    report.failed.push(RecomputeFailureDto {
                        trade_id,
                        error: err.to_report(),
                    });
                }
            }
        }

        let aggregator = self.aggregator.clone();
        let model = self.greeks;
        let outcomes = tokio::task::spawn_blocking(move || {
            loaded
                .into_par_iter()
                .map(|inputs| {
                    let outcome = inputs.recompute(&aggregator, RecomputeMode::Refresh);
                    let greeks = summary_greeks(model.as_ref(), &inputs.trade, &outcome);
                    (inputs.trade, outcome, greeks)
                })
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| EngineError::internal(format!("Recompute task failed: {e}")))?;

        for (trade, outcome, greeks) in outcomes {
            let trade_id = trade.id;
            match self.ports.commit(trade, outcome).await {
                Ok(dto) => report.updated.push(dto.with_greeks(greeks)),
                Err(err) => report.failed.push(RecomputeFailureDto {
                    trade_id,
                    error: err.to_report(),
                }),
            }
        }

        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Recomputed all trades"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::application::ports::{
        MockContractRepositoryPort, MockQuoteProviderPort, MockStatementRepositoryPort,
        MockTradeRepositoryPort, RepositoryError,
    };
    use crate::domain::ledger::{ContractDescriptor, Fill, StatementDetail, StatementEvent};
    use crate::domain::shared::{ContractId, StatementId, TradeId};
    use crate::domain::trade::{Trade, TradeStatus};

    const STOCK: ContractId = ContractId::new(1);
    const MISSING: ContractId = ContractId::new(2);

    fn buy(id: i64, trade_id: i64, contract_id: ContractId) -> StatementEvent {
        StatementEvent {
            id: StatementId::new(id),
            date: Utc.with_ymd_and_hms(2025, 2, 3, 15, 0, 0).unwrap(),
            sequence: 0,
            trade_id: Some(TradeId::new(trade_id)),
            currency: "USD".to_string(),
            fx_rate_to_base: Decimal::ONE,
            net_cash: dec!(-1000),
            detail: StatementDetail::EquityTrade(Fill {
                contract_id,
                quantity: dec!(10),
                price: dec!(100),
                realized_pnl: Decimal::ZERO,
            }),
        }
    }

    #[tokio::test]
    async fn test_one_bad_trade_does_not_block_others() {
        let mut trades = MockTradeRepositoryPort::new();
        trades
            .expect_list_ids()
            .returning(|| Ok(vec![TradeId::new(1), TradeId::new(2), TradeId::new(3)]));
        trades.expect_find_by_id().returning(|id| match id.value() {
            3 => Err(RepositoryError::Unavailable("shard down".to_string())),
            _ => Ok(Some(Trade::new(id, "XYZ", "USD"))),
        });
        trades.expect_save().times(2).returning(|_| Ok(()));

        let mut statements = MockStatementRepositoryPort::new();
        statements.expect_list_for_trade().returning(|id| {
            Ok(vec![match id.value() {
                1 => buy(1, 1, STOCK),
                _ => buy(2, 2, MISSING),
            }])
        });

        let mut contracts = MockContractRepositoryPort::new();
        contracts
            .expect_find_many()
            .returning(|_| Ok(HashMap::from([(STOCK, ContractDescriptor::stock(STOCK, "XYZ"))])));

        let mut quotes = MockQuoteProviderPort::new();
        quotes
            .expect_latest_prices()
            .returning(|_| Ok(HashMap::from([(STOCK, dec!(105))])));

        let ports = LedgerPorts::new(
            Arc::new(statements),
            Arc::new(contracts),
            Arc::new(trades),
            Arc::new(quotes),
        );
        let report = RecomputeAllTradesUseCase::new(ports, TradeAggregator::default())
            .execute()
            .await
            .unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].trade_id, TradeId::new(1));
        assert_eq!(report.updated[0].status, TradeStatus::Open);
        assert_eq!(report.updated[0].positions[0].unrealized_pnl, Some(dec!(50)));

        let mut failed: Vec<_> = report.failed.iter().map(|f| f.trade_id.value()).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec![2, 3]);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_unreadable_trade_list_fails() {
        let mut trades = MockTradeRepositoryPort::new();
        trades
            .expect_list_ids()
            .returning(|| Err(RepositoryError::Unavailable("offline".to_string())));

        let ports = LedgerPorts::new(
            Arc::new(MockStatementRepositoryPort::new()),
            Arc::new(MockContractRepositoryPort::new()),
            Arc::new(trades),
            Arc::new(MockQuoteProviderPort::new()),
        );
        let result = RecomputeAllTradesUseCase::new(ports, TradeAggregator::default())
            .execute()
            .await;

        assert!(result.is_err());
    }
}
