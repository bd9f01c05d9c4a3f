//! Ledger Replay
//!
//! Folds an ordered statement ledger into per-contract virtual legs. The fold
//! is incremental: applying the events of any prefix one by one yields the same
//! legs as replaying that prefix in one call.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::domain::ledger::errors::LedgerError;
use crate::domain::ledger::value_objects::{
    ContractDescriptor, Fill, StatementEvent, StatementKind, VirtualLeg, sorted_by_ledger_order,
};
use crate::domain::shared::ContractId;

/// Legs keyed by contract, in contract-id order.
pub type LegMap = BTreeMap<ContractId, VirtualLeg>;

/// Incremental ledger fold.
#[derive(Debug, Clone)]
pub struct LedgerReplay<'a> {
    contracts: &'a HashMap<ContractId, ContractDescriptor>,
    legs: LegMap,
    cash_flows: Vec<StatementEvent>,
    pnl: Decimal,
    fills: usize,
}

impl<'a> LedgerReplay<'a> {
    /// Create an empty replay over a contract catalog.
    #[must_use]
    pub fn new(contracts: &'a HashMap<ContractId, ContractDescriptor>) -> Self {
        Self {
            contracts,
            legs: LegMap::new(),
            cash_flows: Vec::new(),
            pnl: Decimal::ZERO,
            fills: 0,
        }
    }

    /// Apply one statement. Events must be applied in ledger order.
    ///
    /// On error the replay is left unchanged.
    pub fn apply(&mut self, event: &StatementEvent) -> Result<(), LedgerError> {
        if event.fx_rate_to_base <= Decimal::ZERO {
            return Err(LedgerError::InvalidFxRate {
                statement_id: event.id,
                rate: event.fx_rate_to_base,
            });
        }

        match event.detail.fill() {
            Some(fill) => self.apply_fill(event, fill),
            None => {
                self.pnl += event.net_cash;
                self.cash_flows.push(event.clone());
                Ok(())
            }
        }
    }

    fn apply_fill(&mut self, event: &StatementEvent, fill: &Fill) -> Result<(), LedgerError> {
        let contract = self
            .contracts
            .get(&fill.contract_id)
            .ok_or(LedgerError::UnknownContract {
                statement_id: event.id,
                contract_id: fill.contract_id,
            })?;

        let kind = event.kind();
        let expects_option = kind == StatementKind::OptionTrade;
        if expects_option != contract.is_option() {
            return Err(LedgerError::KindMismatch {
                statement_id: event.id,
                kind,
                sec_type: contract.sec_type(),
            });
        }

        let before = self
            .legs
            .get(&fill.contract_id)
            .map_or(Decimal::ZERO, |leg| leg.quantity);
        let after = before + fill.quantity;
        let flips = !before.is_zero()
            && !after.is_zero()
            && before.is_sign_positive() != after.is_sign_positive();
        if flips {
            return Err(LedgerError::SignFlip {
                statement_id: event.id,
                contract_id: fill.contract_id,
                before,
                after,
            });
        }

        self.legs
            .entry(fill.contract_id)
            .or_insert_with(|| VirtualLeg::new(contract.clone()))
            .apply_fill(fill.quantity, event.net_cash, fill.realized_pnl);
        self.pnl += fill.realized_pnl;
        self.fills += 1;
        Ok(())
    }

    /// Current legs, including flat ones.
    #[must_use]
    pub const fn legs(&self) -> &LegMap {
        &self.legs
    }

    /// Non-trade events seen so far, in application order.
    #[must_use]
    pub fn cash_flows(&self) -> &[StatementEvent] {
        &self.cash_flows
    }

    /// Realized PnL of fills plus net cash of non-trade events, in event currency.
    #[must_use]
    pub const fn pnl_so_far(&self) -> Decimal {
        self.pnl
    }

    /// Number of fills applied.
    #[must_use]
    pub const fn fill_count(&self) -> usize {
        self.fills
    }

    /// Consume the replay and return its legs.
    #[must_use]
    pub fn into_legs(self) -> LegMap {
        self.legs
    }
}

/// Replay a ledger into virtual legs.
///
/// The events are sorted by `(date, sequence)` first; the caller's slice is
/// not reordered.
pub fn replay(
    events: &[StatementEvent],
    contracts: &HashMap<ContractId, ContractDescriptor>,
) -> Result<LegMap, LedgerError> {
    let mut state = LedgerReplay::new(contracts);
    for event in sorted_by_ledger_order(events) {
        state.apply(&event)?;
    }
    Ok(state.into_legs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::value_objects::{CashFlow, OptionRight, StatementDetail};
    use crate::domain::shared::StatementId;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    const STOCK: ContractId = ContractId::new(1);
    const PUT: ContractId = ContractId::new(2);

    fn catalog() -> HashMap<ContractId, ContractDescriptor> {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let put = ContractDescriptor::option(PUT, "XYZ", OptionRight::Put, dec!(100), expiry)
            .unwrap();
        HashMap::from([(STOCK, ContractDescriptor::stock(STOCK, "XYZ")), (PUT, put)])
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 14, 30, 0).unwrap() + Duration::minutes(minutes)
    }

    fn fill(id: i64, minutes: i64, contract: ContractId, qty: Decimal, cash: Decimal) -> StatementEvent {
        let fill = Fill {
            contract_id: contract,
            quantity: qty,
            price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        };
        let detail = if contract == PUT {
            StatementDetail::OptionTrade(fill)
        } else {
            StatementDetail::EquityTrade(fill)
        };
        StatementEvent {
            id: StatementId::new(id),
            date: at(minutes),
            sequence: id as u64,
            trade_id: None,
            currency: "USD".to_string(),
            fx_rate_to_base: Decimal::ONE,
            net_cash: cash,
            detail,
        }
    }

    #[test]
    fn empty_ledger_yields_no_legs() {
        let legs = replay(&[], &catalog()).unwrap();
        assert!(legs.is_empty());
    }

    #[test]
    fn replay_is_idempotent_and_order_independent() {
        let events = vec![
            fill(1, 0, STOCK, dec!(100), dec!(-9800)),
            fill(2, 1, PUT, dec!(1), dec!(-200)),
            fill(3, 60, STOCK, dec!(-50), dec!(5000)),
        ];
        let first = replay(&events, &catalog()).unwrap();
        let second = replay(&events, &catalog()).unwrap();
        assert_eq!(first, second);

        let mut reversed = events.clone();
        reversed.reverse();
        assert_eq!(replay(&reversed, &catalog()).unwrap(), first);

        let stock = &first[&STOCK];
        assert_eq!(stock.quantity, dec!(50));
        assert_eq!(stock.cost_basis, dec!(4800));
        assert_eq!(first[&PUT].pru, dec!(2));
    }

    #[test]
    fn non_trade_events_do_not_touch_legs() {
        let mut dividend = fill(9, 5, STOCK, Decimal::ZERO, dec!(24));
        dividend.detail = StatementDetail::Dividend(CashFlow {
            contract_id: Some(STOCK),
            description: "cash dividend".to_string(),
        });

        let contracts = catalog();
        let mut state = LedgerReplay::new(&contracts);
        state.apply(&fill(1, 0, STOCK, dec!(100), dec!(-9800))).unwrap();
        state.apply(&dividend).unwrap();

        assert_eq!(state.legs()[&STOCK].cost_basis, dec!(9800));
        assert_eq!(state.cash_flows().len(), 1);
        assert_eq!(state.pnl_so_far(), dec!(24));
        assert_eq!(state.fill_count(), 1);
    }

    #[test]
    fn unknown_contract_is_rejected() {
        let event = fill(1, 0, ContractId::new(99), dec!(1), dec!(-1));
        let Err(err) = replay(&[event], &catalog()) else {
            panic!("expected unknown contract");
        };
        assert!(matches!(err, LedgerError::UnknownContract { .. }));
    }

    #[test]
    fn option_kind_must_reference_option() {
        let mut event = fill(1, 0, STOCK, dec!(1), dec!(-1));
        event.detail = StatementDetail::OptionTrade(event.detail.fill().unwrap().clone());
        let Err(err) = replay(&[event], &catalog()) else {
            panic!("expected kind mismatch");
        };
        assert!(matches!(
            err,
            LedgerError::KindMismatch { kind: StatementKind::OptionTrade, .. }
        ));
    }

    #[test]
    fn sign_flip_in_one_fill_is_rejected() {
        let events = vec![
            fill(1, 0, STOCK, dec!(100), dec!(-10000)),
            fill(2, 1, STOCK, dec!(-150), dec!(15000)),
        ];
        let Err(err) = replay(&events, &catalog()) else {
            panic!("expected sign flip");
        };
        assert_eq!(
            err,
            LedgerError::SignFlip {
                statement_id: StatementId::new(2),
                contract_id: STOCK,
                before: dec!(100),
                after: dec!(-50),
            }
        );
    }

    #[test]
    fn non_positive_fx_rate_is_rejected() {
        let mut event = fill(1, 0, STOCK, dec!(1), dec!(-1));
        event.fx_rate_to_base = Decimal::ZERO;
        assert!(matches!(
            replay(&[event], &catalog()),
            Err(LedgerError::InvalidFxRate { .. })
        ));
    }

    #[test]
    fn failed_apply_leaves_state_unchanged() {
        let contracts = catalog();
        let mut state = LedgerReplay::new(&contracts);
        state.apply(&fill(1, 0, STOCK, dec!(10), dec!(-1000))).unwrap();
        let before = state.legs().clone();

        assert!(state.apply(&fill(2, 1, STOCK, dec!(-20), dec!(2000))).is_err());
        assert_eq!(state.legs(), &before);
    }

    proptest! {
        #[test]
        fn flat_leg_has_zero_cost_basis(
            lots in prop::collection::vec((1i64..500, 1i64..100_000), 1..12),
        ) {
            let mut events = Vec::new();
            let mut id = 0;
            for (qty, cents) in &lots {
                id += 1;
                events.push(fill(id, id, STOCK, Decimal::from(*qty), -Decimal::new(*cents, 2)));
            }
            for (qty, cents) in &lots {
                id += 1;
                events.push(fill(id, id, STOCK, -Decimal::from(*qty), Decimal::new(*cents * 3, 2)));
            }

            let legs = replay(&events, &catalog()).unwrap();
            let leg = &legs[&STOCK];
            prop_assert!(leg.quantity.is_zero());
            prop_assert_eq!(leg.cost_basis, Decimal::ZERO);
            prop_assert_eq!(leg.pru, Decimal::ZERO);
        }

        #[test]
        fn prefix_replay_matches_incremental_apply(split in 0usize..4) {
            let events = vec![
                fill(1, 0, STOCK, dec!(100), dec!(-9800)),
                fill(2, 1, PUT, dec!(1), dec!(-200)),
                fill(3, 2, PUT, dec!(-1), dec!(150)),
                fill(4, 3, STOCK, dec!(-40), dec!(4100)),
            ];
            let contracts = catalog();
            let mut state = LedgerReplay::new(&contracts);
            for event in &events[..split] {
                state.apply(event).unwrap();
            }
            let prefix = replay(&events[..split], &contracts).unwrap();
            prop_assert_eq!(state.legs(), &prefix);
        }
    }
}
