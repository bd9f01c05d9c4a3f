//! Recompute Trade Use Case

use tracing::instrument;

use crate::application::dto::TradeSummaryDto;
use crate::application::ports::{
    ContractRepositoryPort, QuoteProviderPort, StatementRepositoryPort, TradeRepositoryPort,
};
use crate::domain::shared::TradeId;
use crate::domain::trade::{RecomputeMode, TradeAggregator};
use crate::error::EngineError;
use crate::pricing::GreeksModel;

use super::ledger_ports::{LedgerPorts, summary_greeks};

/// Use case for recomputing one trade from its statements.
pub struct RecomputeTradeUseCase<S, C, T, Q> {
    ports: LedgerPorts<S, C, T, Q>,
    aggregator: TradeAggregator,
    greeks: Option<GreeksModel>,
}

impl<S, C, T, Q> RecomputeTradeUseCase<S, C, T, Q>
where
    S: StatementRepositoryPort,
    C: ContractRepositoryPort,
    T: TradeRepositoryPort,
    Q: QuoteProviderPort,
{
    /// Create a new `RecomputeTradeUseCase`.
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
    /// `TRADE_NOT_FOUND` for an unknown id, `REPOSITORY_ERROR` when storage
    /// fails, or the domain error that left the trade flagged for retry.
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        trade_id: TradeId,
        mode: RecomputeMode,
    ) -> Result<TradeSummaryDto, EngineError> {
        let inputs = self.ports.load(trade_id).await?;
        let outcome = inputs.recompute(&self.aggregator, mode);
        let greeks = summary_greeks(self.greeks.as_ref(), &inputs.trade, &outcome);
        let dto = self.ports.commit(inputs.trade, outcome).await?;
        Ok(dto.with_greeks(greeks))
    }
}
