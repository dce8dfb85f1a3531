//! Multi-strategy batch summary.
//!
//! Runs the engine once per strategy spec. Runs are mutually independent —
//! each gets a fresh position book and ledger — so the batch executes in
//! parallel with rayon while reading the store concurrently.

use crate::metrics::{daily_volatility, max_drawdown, total_pnl};
use crate::pnl::pnl_series;
use daylab_core::engine::{backtest, EngineConfig};
use daylab_core::signal::StrategySpec;
use daylab_core::store::QuoteStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One strategy's row in the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub strategy: String,
    pub total_pnl: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub trading_days: usize,
    pub gap_count: usize,
}

/// A strategy whose run aborted. The rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFailure {
    pub strategy: String,
    pub error: String,
}

/// Batch result: one row per completed spec plus any failures.
///
/// Rows keep the caller's spec order — the table is never re-sorted by a
/// metric. Callers that want a ranking sort a copy themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
    pub failures: Vec<SummaryFailure>,
}

impl SummaryTable {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every spec over the store and tabulate the results.
///
/// A failing spec (policy contract violation, configuration error) lands in
/// `failures` with its diagnostic; completed rows are never discarded because
/// a sibling strategy aborted.
pub fn summarize(
    specs: &[StrategySpec],
    store: &QuoteStore,
    config: &EngineConfig,
) -> SummaryTable {
    let outcomes: Vec<Result<SummaryRow, SummaryFailure>> = specs
        .par_iter()
        .map(|spec| {
            backtest(store, config, spec.open_policy(), spec.close_policy())
                .map(|result| {
                    let series = pnl_series(&result.ledger);
                    SummaryRow {
                        strategy: spec.name().to_string(),
                        total_pnl: total_pnl(&series),
                        volatility: daily_volatility(&series),
                        max_drawdown: max_drawdown(&series),
                        trading_days: result.day_count,
                        gap_count: result.gap_count,
                    }
                })
                .map_err(|e| SummaryFailure {
                    strategy: spec.name().to_string(),
                    error: e.to_string(),
                })
        })
        .collect();

    // collect() on an indexed parallel iterator preserves input order.
    let mut rows = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(row) => rows.push(row),
            Err(failure) => failures.push(failure),
        }
    }

    SummaryTable { rows, failures }
}
