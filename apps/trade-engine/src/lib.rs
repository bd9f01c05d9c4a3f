// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::items_after_statements
    )
)]

//! Trade Engine - Rust Core Library
//!
//! Reconstructs option and equity trades from an immutable statement ledger,
//! measures their worst-case settlement risk, classifies the strategy they
//! implement, and prices option legs.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic, synchronous and deterministic
//!   - `ledger`: Statements, contracts, virtual legs, replay
//!   - `risk`: Combo risk over terminal price scenarios
//!   - `strategy`: Strategy classification and refinement
//!   - `trade`: Trade aggregate and recomputation
//!
//! - **Pricing**: Black-Scholes price and Greeks, implied volatility
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Storage and quote interfaces
//!   - `use_cases`: `RecomputeTrade`, `RecomputeAllTrades`
//!   - `dto`: Trade and position reports
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: In-memory ledger store
//!   - `ingestion`: Coalescing, prioritized broker intake

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Option pricing model.
pub mod pricing;

/// Configuration loading.
pub mod config;

/// Structured engine errors.
pub mod error;

/// Logging setup.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::ledger::{ContractDescriptor, StatementEvent, VirtualLeg, replay};
pub use domain::risk::{ComboRisk, ComboRiskAnalyzer};
pub use domain::shared::{ContractId, StatementId, TradeId};
pub use domain::strategy::{Strategy, StrategyClassifier};
pub use domain::trade::{RecomputeMode, Trade, TradeAggregator, TradeStatus, TradeSummary};

// Application re-exports
pub use application::dto::{RecomputeReport, TradeSummaryDto, VirtualPositionDto};
pub use application::use_cases::{LedgerPorts, RecomputeAllTradesUseCase, RecomputeTradeUseCase};

// Infrastructure re-exports
pub use infrastructure::persistence::{InMemoryLedgerStore, LedgerSnapshot};

pub use error::{EngineError, ErrorCode};
