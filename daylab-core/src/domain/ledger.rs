//! Ledger — append-only per-day record of actions and portfolio value.
//!
//! The ledger is the authoritative record of a run. The PnL series is always
//! derived from it, never stored separately.

use super::action::ActionSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two decision points within a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Open,
    Close,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Open => write!(f, "open"),
            Phase::Close => write!(f, "close"),
        }
    }
}

/// A quote that was missing for one symbol at one phase. The run continues;
/// the gap is recorded here instead of raising an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRecord {
    pub symbol: String,
    pub phase: Phase,
}

/// One trading day's entry: the actions actually taken at each phase and the
/// portfolio value after each phase.
///
/// `open_actions`/`close_actions` hold the *recorded* actions — the entries a
/// policy requested that could actually fill (symbol quoted that day, non-zero
/// delta). `liquidation` is set on the final day only, holding the synthesized
/// close-all actions that flatten every remaining position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub open_actions: ActionSet,
    pub close_actions: ActionSet,
    pub value_at_open: f64,
    pub value_at_close: f64,
    pub gaps: Vec<GapRecord>,
    pub liquidation: Option<ActionSet>,
}

/// Append-only sequence of day records, one per trading day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    days: Vec<DayRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DayRecord) {
        self.days.push(record);
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn last(&self) -> Option<&DayRecord> {
        self.days.last()
    }

    /// Content hash of the full ledger.
    ///
    /// All containers underneath serialize in deterministic order, so two
    /// runs of the same strategy over the same store hash identically.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("ledger serialization cannot fail");
        blake3::hash(&bytes).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(day: u32, value: f64) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open_actions: ActionSet::new().with("SPY", 1.0),
            close_actions: ActionSet::new(),
            value_at_open: 0.0,
            value_at_close: value,
            gaps: vec![],
            liquidation: None,
        }
    }

    #[test]
    fn push_appends_in_order() {
        let mut ledger = Ledger::new();
        ledger.push(sample_record(2, 1.0));
        ledger.push(sample_record(3, 2.0));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.days()[0].value_at_close, 1.0);
        assert_eq!(ledger.last().unwrap().value_at_close, 2.0);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let mut a = Ledger::new();
        a.push(sample_record(2, 1.0));
        let mut b = Ledger::new();
        b.push(sample_record(2, 1.0));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let mut a = Ledger::new();
        a.push(sample_record(2, 1.0));
        let mut b = Ledger::new();
        b.push(sample_record(2, 1.5));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
