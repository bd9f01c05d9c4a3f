//! Integration tests for broker data ingestion.
//!
//! Statements flow through the prioritized queue into the ledger store and
//! are picked up by the next recomputation.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

use trade_engine::application::ports::{RepositoryError, StatementRepositoryPort};
use trade_engine::application::use_cases::{LedgerPorts, RecomputeTradeUseCase};
use trade_engine::domain::ledger::{CashFlow, Fill, StatementDetail, StatementEvent};
use trade_engine::domain::shared::{ContractId, StatementId, TradeId};
use trade_engine::domain::trade::{RecomputeMode, TradeAggregator};
use trade_engine::infrastructure::ingestion::{
    IngestionHandle, IngestionLane, PushOutcome, QueueError, run_ingestion_worker,
};
use trade_engine::infrastructure::persistence::{InMemoryLedgerStore, LedgerSnapshot};

const SAMPLE_LEDGER: &str = include_str!("../../../demos/sample_ledger.json");

fn abc_purchase(quantity: Decimal) -> StatementEvent {
    StatementEvent {
        id: StatementId::new(10),
        date: Utc.with_ymd_and_hms(2025, 5, 6, 13, 45, 0).unwrap(),
        sequence: 0,
        trade_id: Some(TradeId::new(2)),
        currency: "EUR".to_string(),
        fx_rate_to_base: Decimal::ONE,
        net_cash: quantity * dec!(-42),
        detail: StatementDetail::EquityTrade(Fill {
            contract_id: ContractId::new(4),
            quantity,
            price: dec!(42),
            realized_pnl: Decimal::ZERO,
        }),
    }
}

fn custody_fee() -> StatementEvent {
    StatementEvent {
        id: StatementId::new(11),
        date: Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap(),
        sequence: 0,
        trade_id: Some(TradeId::new(2)),
        currency: "EUR".to_string(),
        fx_rate_to_base: Decimal::ONE,
        net_cash: dec!(-1),
        detail: StatementDetail::Fee(CashFlow {
            contract_id: Some(ContractId::new(4)),
            description: "custody fee".to_string(),
        }),
    }
}

#[tokio::test]
async fn test_ingested_statements_reach_recomputation() {
    let snapshot: LedgerSnapshot = serde_json::from_str(SAMPLE_LEDGER).unwrap();
    let store = Arc::new(InMemoryLedgerStore::from_snapshot(snapshot).unwrap());
    let baseline = store.statement_count();

    let handle: IngestionHandle<String, StatementEvent> = IngestionHandle::new(8);
    handle
        .submit(IngestionLane::Cash, "stmt-11".to_string(), custody_fee())
        .unwrap();
    handle
        .submit(IngestionLane::Orders, "stmt-10".to_string(), abc_purchase(dec!(10)))
        .unwrap();
    // Broker correction for the same execution before it was processed.
    let outcome = handle
        .submit(IngestionLane::Orders, "stmt-10".to_string(), abc_purchase(dec!(20)))
        .unwrap();
    assert_eq!(outcome, PushOutcome::Coalesced);

    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();
    let sink = Arc::clone(&store);
    let processed = run_ingestion_worker(handle.clone(), shutdown, move |_lane, _key, statement| {
        let sink = Arc::clone(&sink);
        let stop = stop.clone();
        async move {
            sink.append(statement).await?;
            if sink.statement_count() >= baseline + 2 {
                stop.cancel();
            }
            Ok::<(), RepositoryError>(())
        }
    })
    .await;

    assert_eq!(processed, 2);
    assert_eq!(handle.pending(), 0);

    let ports = LedgerPorts::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    );
    let summary = RecomputeTradeUseCase::new(ports, TradeAggregator::default())
        .execute(TradeId::new(2), RecomputeMode::Refresh)
        .await
        .unwrap();

    let position = summary.open_positions().next().unwrap();
    assert_eq!(position.quantity, dec!(70));
    assert_eq!(position.cost_basis, dec!(2840));
    // Dividend 25 minus the custody fee.
    assert_eq!(summary.realized_pnl, dec!(24));
}

#[tokio::test]
async fn test_duplicate_statement_is_logged_not_fatal() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let handle: IngestionHandle<String, StatementEvent> = IngestionHandle::new(4);
    handle
        .submit(IngestionLane::Cash, "a".to_string(), custody_fee())
        .unwrap();
    handle
        .submit(IngestionLane::Cash, "b".to_string(), custody_fee())
        .unwrap();

    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();
    let sink = Arc::clone(&store);
    let mut calls = 0;
    let processed = run_ingestion_worker(handle, shutdown, move |_lane, _key, statement| {
        calls += 1;
        if calls == 2 {
            stop.cancel();
        }
        let sink = Arc::clone(&sink);
        async move { sink.append(statement).await }
    })
    .await;

    assert_eq!(processed, 2);
    assert_eq!(store.statement_count(), 1);
}

#[test]
fn test_full_lane_rejects_new_keys() {
    let handle: IngestionHandle<u64, ()> = IngestionHandle::new(1);
    handle.submit(IngestionLane::Positions, 1, ()).unwrap();

    assert_eq!(
        handle.submit(IngestionLane::Positions, 2, ()),
        Err(QueueError::Full { capacity: 1 })
    );
    assert!(handle.submit(IngestionLane::Orders, 2, ()).is_ok());
}
