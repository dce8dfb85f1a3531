//! PnL series — pure derivation from a run ledger.
//!
//! The series is never stored independently of the ledger it came from;
//! anything that needs it derives it again.

use chrono::NaiveDate;
use daylab_core::domain::Ledger;
use serde::{Deserialize, Serialize};

/// One day of profit and loss, in cash terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub daily: f64,
    pub cumulative: f64,
}

/// Derive the daily/cumulative PnL series from a ledger.
///
/// Cash starts at zero, so each day's cumulative PnL is its recorded value at
/// close, and the daily figure is the difference from the previous day.
pub fn pnl_series(ledger: &Ledger) -> Vec<PnlPoint> {
    let mut series = Vec::with_capacity(ledger.len());
    let mut prev = 0.0;
    for day in ledger.days() {
        series.push(PnlPoint {
            date: day.date,
            daily: day.value_at_close - prev,
            cumulative: day.value_at_close,
        });
        prev = day.value_at_close;
    }
    series
}
