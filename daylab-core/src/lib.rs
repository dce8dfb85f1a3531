//! DayLab Core — quote store, signal policies, day-by-day backtest engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (quotes, action sets, positions, the run ledger)
//! - Quote store with explicit-universe construction and ordered day lookup
//! - Signal policy interface (strategies as ordinary functions)
//! - Two-phase daily event loop with final liquidation
//! - Data layer: provider trait, Yahoo Finance fetch, CSV cache, synthetic
//!   quote generation

pub mod data;
pub mod domain;
pub mod engine;
pub mod policies;
pub mod signal;
pub mod store;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the runner's rayon batch boundary
    /// are Send + Sync. If any of these regress, the build breaks here rather
    /// than deep inside a parallel summary call.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Quote>();
        require_sync::<domain::Quote>();
        require_send::<domain::ActionSet>();
        require_sync::<domain::ActionSet>();
        require_send::<domain::PositionBook>();
        require_sync::<domain::PositionBook>();
        require_send::<domain::Ledger>();
        require_sync::<domain::Ledger>();
        require_send::<domain::DayRecord>();
        require_sync::<domain::DayRecord>();

        // Store and engine types
        require_send::<store::QuoteStore>();
        require_sync::<store::QuoteStore>();
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();

        // Strategy specs run inside rayon tasks
        require_send::<signal::StrategySpec>();
        require_sync::<signal::StrategySpec>();
    }
}
