//! Application Ports (Driven)
//!
//! Interfaces the use cases need from storage and market data. Adapters live
//! in `infrastructure`.

mod contract_repository_port;
mod quote_provider_port;
mod repository_error;
mod statement_repository_port;
mod trade_repository_port;

pub use contract_repository_port::ContractRepositoryPort;
pub use quote_provider_port::QuoteProviderPort;
pub use repository_error::RepositoryError;
pub use statement_repository_port::StatementRepositoryPort;
pub use trade_repository_port::TradeRepositoryPort;

#[cfg(test)]
pub use contract_repository_port::MockContractRepositoryPort;
#[cfg(test)]
pub use quote_provider_port::MockQuoteProviderPort;
#[cfg(test)]
pub use statement_repository_port::MockStatementRepositoryPort;
#[cfg(test)]
pub use trade_repository_port::MockTradeRepositoryPort;
