//! DayLab Runner — PnL derivation, metrics, batch summaries, config, export.
//!
//! The runner owns everything downstream of the engine: deriving the PnL
//! series from a ledger, computing comparison metrics, fanning a batch of
//! strategy specs across rayon, and persisting results as CSV.

pub mod config;
pub mod export;
pub mod metrics;
pub mod pnl;
pub mod summary;

pub use config::{default_universe, ConfigError, RunConfig};
pub use export::{
    export_pnl_csv, export_summary_csv, render_summary_text, write_pnl_csv, write_summary_csv,
};
pub use pnl::{pnl_series, PnlPoint};
pub use summary::{summarize, SummaryFailure, SummaryRow, SummaryTable};
