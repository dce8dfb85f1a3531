//! Backtest engine — the day-by-day state machine.
//!
//! One run walks the trading calendar in strict order: open phase, close
//! phase, next day. Position and cash are sequential accumulators (day N
//! starts from day N-1's ending state), so days are never reordered or
//! parallelized within a run. Batches of independent runs parallelize one
//! level up, in the runner.

pub(crate) mod accounting;
pub mod event_loop;

pub use event_loop::{backtest, RunResult};

use crate::domain::Phase;
use chrono::NaiveDate;
use thiserror::Error;

/// Date range for one run. The universe comes from the store; display
/// precision is a presentation concern handled by the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EngineConfig {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Fatal engine errors.
///
/// Data gaps are *not* errors — a missing quote skips that symbol for that
/// phase and is recorded in the day's [`crate::domain::GapRecord`]s. Errors
/// here abort the run: the first three are configuration mistakes caught
/// before any day is simulated, the last two are policy contract violations
/// that indicate a bug in the strategy.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("empty trading universe")]
    EmptyUniverse,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no quotes for '{symbol}' anywhere in {start}..={end}")]
    NoDataForSymbol {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("policy acted on '{symbol}', which is outside the trading universe ({date} {phase})")]
    UnknownActionSymbol {
        symbol: String,
        date: NaiveDate,
        phase: Phase,
    },

    #[error("policy returned non-finite volume {volume} for '{symbol}' ({date} {phase})")]
    NonFiniteVolume {
        symbol: String,
        volume: f64,
        date: NaiveDate,
        phase: Phase,
    },
}
