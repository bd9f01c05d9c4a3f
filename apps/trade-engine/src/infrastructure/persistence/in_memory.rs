//! In-memory ledger store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ContractRepositoryPort, QuoteProviderPort, RepositoryError, StatementRepositoryPort,
    TradeRepositoryPort,
};
use crate::domain::ledger::{ContractDescriptor, StatementEvent};
use crate::domain::shared::{ContractId, StatementId, TradeId};
use crate::domain::trade::Trade;

/// Serializable contents of a ledger store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Contract reference data.
    #[serde(default)]
    pub contracts: Vec<ContractDescriptor>,
    /// Statement rows.
    #[serde(default)]
    pub statements: Vec<StatementEvent>,
    /// Trades.
    #[serde(default)]
    pub trades: Vec<Trade>,
    /// Latest price per contract.
    #[serde(default)]
    pub quotes: HashMap<ContractId, Decimal>,
}

/// In-memory implementation of every storage and quote port.
///
/// Suitable for testing and the batch binary. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    contracts: RwLock<HashMap<ContractId, ContractDescriptor>>,
    statements: RwLock<BTreeMap<StatementId, StatementEvent>>,
    trades: RwLock<BTreeMap<TradeId, Trade>>,
    quotes: RwLock<HashMap<ContractId, Decimal>>,
}

impl InMemoryLedgerStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStatement` if two rows share an id.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, RepositoryError> {
        let store = Self::new();
        {
            let mut contracts = store.contracts.write().unwrap_or_else(PoisonError::into_inner);
            contracts.extend(snapshot.contracts.into_iter().map(|c| (c.id(), c)));
        }
        {
            let mut statements = store.statements.write().unwrap_or_else(PoisonError::into_inner);
            for statement in snapshot.statements {
                if statements.contains_key(&statement.id) {
                    return Err(RepositoryError::DuplicateStatement(statement.id));
                }
                statements.insert(statement.id, statement);
            }
        }
        {
            let mut trades = store.trades.write().unwrap_or_else(PoisonError::into_inner);
            trades.extend(snapshot.trades.into_iter().map(|t| (t.id, t)));
        }
        *store.quotes.write().unwrap_or_else(PoisonError::into_inner) = snapshot.quotes;
        Ok(store)
    }

    /// Add or replace a contract (for test setup).
    pub fn add_contract(&self, contract: ContractDescriptor) {
        self.contracts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(contract.id(), contract);
    }

    /// Set the latest quote of a contract.
    pub fn set_quote(&self, contract_id: ContractId, price: Decimal) {
        self.quotes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(contract_id, price);
    }

    /// Number of recorded statements.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl StatementRepositoryPort for InMemoryLedgerStore {
    async fn list_for_trade(
        &self,
        trade_id: TradeId,
    ) -> Result<Vec<StatementEvent>, RepositoryError> {
        let statements = self
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(statements
            .values()
            .filter(|s| s.trade_id == Some(trade_id))
            .cloned()
            .collect())
    }

    async fn append(&self, statement: StatementEvent) -> Result<(), RepositoryError> {
        let mut statements = self
            .statements
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if statements.contains_key(&statement.id) {
            return Err(RepositoryError::DuplicateStatement(statement.id));
        }
        statements.insert(statement.id, statement);
        drop(statements);
        Ok(())
    }

    async fn assign_to_trade(
        &self,
        statement_id: StatementId,
        trade_id: TradeId,
    ) -> Result<(), RepositoryError> {
        let mut statements = self
            .statements
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let statement = statements
            .get_mut(&statement_id)
            .ok_or(RepositoryError::StatementNotFound(statement_id))?;
        statement.trade_id = Some(trade_id);
        drop(statements);
        Ok(())
    }
}

#[async_trait]
impl ContractRepositoryPort for InMemoryLedgerStore {
    async fn find_many(
        &self,
        ids: &[ContractId],
    ) -> Result<HashMap<ContractId, ContractDescriptor>, RepositoryError> {
        let contracts = self
            .contracts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .filter_map(|id| contracts.get(id).map(|c| (*id, c.clone())))
            .collect())
    }
}

#[async_trait]
impl TradeRepositoryPort for InMemoryLedgerStore {
    async fn find_by_id(&self, trade_id: TradeId) -> Result<Option<Trade>, RepositoryError> {
        let trades = self.trades.read().unwrap_or_else(PoisonError::into_inner);
        Ok(trades.get(&trade_id).cloned())
    }

    async fn save(&self, trade: &Trade) -> Result<(), RepositoryError> {
        let mut trades = self.trades.write().unwrap_or_else(PoisonError::into_inner);
        trades.insert(trade.id, trade.clone());
        drop(trades);
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<TradeId>, RepositoryError> {
        let trades = self.trades.read().unwrap_or_else(PoisonError::into_inner);
        Ok(trades.keys().copied().collect())
    }
}

#[async_trait]
impl QuoteProviderPort for InMemoryLedgerStore {
    async fn latest_prices(
        &self,
        ids: &[ContractId],
    ) -> Result<HashMap<ContractId, Decimal>, RepositoryError> {
        let quotes = self.quotes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .filter_map(|id| quotes.get(id).map(|price| (*id, *price)))
            .collect())
    }
}
