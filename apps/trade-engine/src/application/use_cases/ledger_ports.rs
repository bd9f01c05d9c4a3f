//! Port bundle shared by the recompute use cases.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::dto::TradeSummaryDto;
use crate::application::ports::{
    ContractRepositoryPort, QuoteProviderPort, StatementRepositoryPort, TradeRepositoryPort,
};
use crate::domain::ledger::{ContractDescriptor, StatementEvent};
use crate::domain::shared::{ContractId, TradeId};
use crate::domain::trade::{RecomputeMode, Trade, TradeAggregator, TradeError, TradeSummary};
use crate::error::EngineError;
use crate::pricing::{Greeks, GreeksModel};

/// Storage and market-data ports needed to recompute a trade.
pub struct LedgerPorts<S, C, T, Q> {
    statements: Arc<S>,
    contracts: Arc<C>,
    trades: Arc<T>,
    quotes: Arc<Q>,
}

impl<S, C, T, Q> Clone for LedgerPorts<S, C, T, Q> {
    fn clone(&self) -> Self {
        Self {
            statements: Arc::clone(&self.statements),
            contracts: Arc::clone(&self.contracts),
            trades: Arc::clone(&self.trades),
            quotes: Arc::clone(&self.quotes),
        }
    }
}

/// Everything a recomputation reads, loaded up front.
#[derive(Debug, Clone)]
pub struct TradeInputs {
    /// Trade being recomputed.
    pub trade: Trade,
    /// Its statements.
    pub statements: Vec<StatementEvent>,
    /// Contracts referenced by the statements.
    pub contracts: HashMap<ContractId, ContractDescriptor>,
    /// Latest prices of those contracts.
    pub quotes: HashMap<ContractId, Decimal>,
}

impl TradeInputs {
    /// Run the aggregator over the loaded inputs.
    pub fn recompute(
        &self,
        aggregator: &TradeAggregator,
        mode: RecomputeMode,
    ) -> Result<TradeSummary, TradeError> {
        aggregator.recompute(
            &self.trade,
            &self.statements,
            &self.contracts,
            &self.quotes,
            mode,
        )
    }
}

impl<S, C, T, Q> LedgerPorts<S, C, T, Q>
where
    S: StatementRepositoryPort,
    C: ContractRepositoryPort,
    T: TradeRepositoryPort,
    Q: QuoteProviderPort,
{
    /// Create a new port bundle.
    pub const fn new(statements: Arc<S>, contracts: Arc<C>, trades: Arc<T>, quotes: Arc<Q>) -> Self {
        Self {
            statements,
            contracts,
            trades,
            quotes,
        }
    }

    /// Ids of every stored trade.
    pub async fn trade_ids(&self) -> Result<Vec<TradeId>, EngineError> {
        Ok(self.trades.list_ids().await?)
    }

    /// Load a trade and the data its recomputation reads.
    ///
    /// A quote lookup failure is logged and treated as "no quotes".
    pub async fn load(&self, trade_id: TradeId) -> Result<TradeInputs, EngineError> {
        let trade = self
            .trades
            .find_by_id(trade_id)
            .await?
            .ok_or_else(|| EngineError::trade_not_found(trade_id))?;

        let statements = self.statements.list_for_trade(trade_id).await?;

        let ids: Vec<ContractId> = statements
            .iter()
            .filter_map(StatementEvent::contract_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let contracts = self.contracts.find_many(&ids).await?;

        let quotes = match self.quotes.latest_prices(&ids).await {
            Ok(quotes) => quotes,
            Err(err) => {
                warn!(trade_id = %trade_id, error = %err, "Quotes unavailable, continuing without prices");
                HashMap::new()
            }
        };

        Ok(TradeInputs {
            trade,
            statements,
            contracts,
            quotes,
        })
    }

    /// Persist the outcome of a recomputation.
    ///
    /// On failure the trade keeps its last-known-good summary, is flagged for
    /// retry, and the domain error is returned.
    pub async fn commit(
        &self,
        mut trade: Trade,
        outcome: Result<TradeSummary, TradeError>,
    ) -> Result<TradeSummaryDto, EngineError> {
        match outcome {
            Ok(summary) => {
                trade.apply_summary(&summary);
                self.trades.save(&trade).await?;
                info!(
                    trade_id = %trade.id,
                    status = %trade.status,
                    strategy = %trade.strategy,
                    risk = %trade.risk,
                    "Trade recomputed"
                );
                Ok(TradeSummaryDto::from_summary(&trade, &summary))
            }
            Err(err) => {
                warn!(trade_id = %trade.id, error = %err, "Trade recomputation failed");
                trade.mark_failed();
                self.trades.save(&trade).await?;
                Err(EngineError::from(err).with_context("trade_id", trade.id.to_string()))
            }
        }
    }
}

/// Greeks of a successful recomputation.
///
/// A pricing failure is logged and leaves the summary without Greeks.
pub(super) fn summary_greeks(
    model: Option<&GreeksModel>,
    trade: &Trade,
    outcome: &Result<TradeSummary, TradeError>,
) -> Option<Greeks> {
    let (model, summary) = (model?, outcome.as_ref().ok()?);
    match model.evaluate(&trade.symbol, &summary.legs) {
        Ok(greeks) => greeks,
        Err(err) => {
            warn!(trade_id = %trade.id, error = %err, "Greeks unavailable");
            None
        }
    }
}
