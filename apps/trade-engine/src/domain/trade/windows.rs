//! Adjustment windows.
//!
//! Statements executed within a short gap of each other (a roll, an
//! assignment and its delivery, a multi-leg order filled leg by leg) form one
//! adjustment. Risk is only sampled at the end of each window so that a combo
//! is never judged half-built.

use chrono::Duration;

use crate::domain::ledger::StatementEvent;

/// Default gap, in minutes, that still joins two statements into one window.
pub const DEFAULT_ADJUSTMENT_WINDOW_MINUTES: i64 = 10;

/// Split ledger-ordered statements into adjustment windows.
///
/// Two consecutive statements share a window when their dates are at most
/// `gap` apart. Never yields an empty window.
#[must_use]
pub fn adjustment_windows(sorted: &[StatementEvent], gap: Duration) -> Vec<&[StatementEvent]> {
    let mut windows = Vec::new();
    let mut start = 0;

    for (i, pair) in sorted.windows(2).enumerate() {
        if pair[1].date - pair[0].date > gap {
            windows.push(&sorted[start..=i]);
            start = i + 1;
        }
    }
    if start < sorted.len() {
        windows.push(&sorted[start..]);
    }
    windows
}
