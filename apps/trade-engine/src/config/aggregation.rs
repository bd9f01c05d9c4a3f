//! Trade aggregation configuration.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::risk::ComboRiskAnalyzer;
use crate::domain::trade::{DEFAULT_ADJUSTMENT_WINDOW_MINUTES, TradeAggregator};

/// Trade aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Largest gap, in minutes, between statements of one adjustment window.
    #[serde(default = "default_adjustment_window_minutes")]
    pub adjustment_window_minutes: i64,
    /// Bond quantity per priced unit.
    #[serde(default = "default_bond_lot_size")]
    pub bond_lot_size: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            adjustment_window_minutes: default_adjustment_window_minutes(),
            bond_lot_size: default_bond_lot_size(),
        }
    }
}

impl AggregationConfig {
    /// Build the aggregator described by this section.
    #[must_use]
    pub fn aggregator(&self) -> TradeAggregator {
        TradeAggregator::new(
            Duration::minutes(self.adjustment_window_minutes),
            ComboRiskAnalyzer::new(Decimal::from(self.bond_lot_size)),
        )
    }
}

const fn default_adjustment_window_minutes() -> i64 {
    DEFAULT_ADJUSTMENT_WINDOW_MINUTES
}

const fn default_bond_lot_size() -> u32 {
    1000
}
