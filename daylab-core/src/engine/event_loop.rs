//! Day-by-day event loop: open phase, close phase, final liquidation.

use crate::domain::{ActionSet, DayRecord, Ledger, Phase, PositionBook};
use crate::engine::accounting::{check_actions, liquidation_for, phase_prices, settle};
use crate::engine::{EngineConfig, EngineError};
use crate::signal::SignalPolicy;
use crate::store::QuoteStore;
use std::collections::BTreeMap;

/// Everything a completed run produces. The ledger is the authoritative
/// record; counts are convenience diagnostics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub ledger: Ledger,
    pub day_count: usize,
    pub gap_count: usize,
}

impl RunResult {
    /// Total realized PnL. Cash starts at zero and the final liquidation
    /// flattens every position, so the last recorded value is fully realized.
    pub fn total_pnl(&self) -> f64 {
        self.ledger.last().map(|d| d.value_at_close).unwrap_or(0.0)
    }
}

/// Run one strategy over the store's universe for the configured date range.
///
/// Per trading day:
/// 1. Look up each symbol's open quote; a missing quote skips that symbol for
///    this phase and is recorded as a gap, never raised to the caller.
/// 2. Invoke the open policy with read-only action histories and fill the
///    returned deltas at the open price (cash moves opposite the volume;
///    short sells raise cash).
/// 3. Repeat 1-2 with the close quote and the close policy.
/// 4. Record portfolio value (cash + positions at last available prices).
///
/// After the last day's close phase a synthesized liquidation closes every
/// remaining position at its last available price, so the sum of daily PnLs
/// equals total realized profit regardless of what the strategy left open.
pub fn backtest(
    store: &QuoteStore,
    config: &EngineConfig,
    open_policy: &dyn SignalPolicy,
    close_policy: &dyn SignalPolicy,
) -> Result<RunResult, EngineError> {
    validate(store, config)?;

    let days = store.trading_days(config.start, config.end);
    let mut book = PositionBook::new();
    let mut last_prices: BTreeMap<String, f64> = BTreeMap::new();
    let mut open_history: Vec<ActionSet> = Vec::new();
    let mut close_history: Vec<ActionSet> = Vec::new();
    let mut ledger = Ledger::new();
    let mut gap_count = 0usize;

    for (index, &day) in days.iter().enumerate() {
        // ── Open phase ──
        let (open_prices, mut gaps) = phase_prices(store, day, Phase::Open, &mut last_prices);
        let desired = open_policy.decide(day, store, &open_history, &close_history);
        check_actions(&desired, store, day, Phase::Open)?;
        let open_recorded = settle(&mut book, &desired, &open_prices);
        open_history.push(open_recorded.clone());
        let value_at_open = book.value(&last_prices);

        // ── Close phase ──
        let (close_prices, close_gaps) = phase_prices(store, day, Phase::Close, &mut last_prices);
        gaps.extend(close_gaps);
        let desired = close_policy.decide(day, store, &open_history, &close_history);
        check_actions(&desired, store, day, Phase::Close)?;
        let close_recorded = settle(&mut book, &desired, &close_prices);
        close_history.push(close_recorded.clone());

        // ── Final liquidation ──
        // Runs on the last day only, at last available prices. Whatever the
        // close policy left open is flattened here.
        let liquidation = if index + 1 == days.len() && !book.is_flat() {
            let desired = liquidation_for(&book);
            Some(settle(&mut book, &desired, &last_prices))
        } else {
            None
        };

        let value_at_close = book.value(&last_prices);
        gap_count += gaps.len();

        ledger.push(DayRecord {
            date: day,
            open_actions: open_recorded,
            close_actions: close_recorded,
            value_at_open,
            value_at_close,
            gaps,
            liquidation,
        });
    }

    debug_assert!(book.is_flat(), "liquidation must flatten every position");

    Ok(RunResult {
        ledger,
        day_count: days.len(),
        gap_count,
    })
}

/// Configuration checks, all fatal before the first simulated day.
fn validate(store: &QuoteStore, config: &EngineConfig) -> Result<(), EngineError> {
    if store.universe().is_empty() {
        return Err(EngineError::EmptyUniverse);
    }
    if config.start > config.end {
        return Err(EngineError::InvalidDateRange {
            start: config.start,
            end: config.end,
        });
    }
    // A symbol with no data at all in range is a configuration mistake, not
    // a day-level gap.
    for symbol in store.universe() {
        if !store.has_data_in_range(symbol, config.start, config.end) {
            return Err(EngineError::NoDataForSymbol {
                symbol: symbol.clone(),
                start: config.start,
                end: config.end,
            });
        }
    }
    Ok(())
}
