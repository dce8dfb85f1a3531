//! CSV and text export for PnL series and batch summaries.
//!
//! The configured precision applies here and only here: exported and printed
//! numbers are formatted to `precision` digits, while the in-memory series
//! and tables stay unrounded.

use std::path::Path;

use anyhow::{Context, Result};

use crate::pnl::PnlPoint;
use crate::summary::SummaryTable;

// ─── CSV export ─────────────────────────────────────────────────────

/// Render a PnL series as CSV with date, daily, and cumulative columns.
pub fn export_pnl_csv(series: &[PnlPoint], precision: usize) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "daily_pnl", "cumulative_pnl"])?;
    for point in series {
        wtr.write_record([
            point.date.to_string(),
            format!("{:.precision$}", point.daily),
            format!("{:.precision$}", point.cumulative),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Render a summary table as CSV, one row per completed strategy, in the
/// order the strategies were supplied.
pub fn export_summary_csv(table: &SummaryTable, precision: usize) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "strategy",
        "total_pnl",
        "volatility",
        "max_drawdown",
        "trading_days",
        "gap_count",
    ])?;
    for row in &table.rows {
        wtr.write_record([
            row.strategy.clone(),
            format!("{:.precision$}", row.total_pnl),
            format!("{:.precision$}", row.volatility),
            format!("{:.precision$}", row.max_drawdown),
            row.trading_days.to_string(),
            row.gap_count.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write a PnL series to a CSV file.
pub fn write_pnl_csv(path: &Path, series: &[PnlPoint], precision: usize) -> Result<()> {
    let csv = export_pnl_csv(series, precision)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Write a summary table to a CSV file.
pub fn write_summary_csv(path: &Path, table: &SummaryTable, precision: usize) -> Result<()> {
    let csv = export_summary_csv(table, precision)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Text rendering ─────────────────────────────────────────────────

/// Fixed-width table for terminal output, failures listed underneath.
pub fn render_summary_text(table: &SummaryTable, precision: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:>14} {:>14} {:>14} {:>8} {:>6}\n",
        "Strategy", "Total PnL", "Volatility", "Max DD", "Days", "Gaps"
    ));
    out.push_str(&"-".repeat(84));
    out.push('\n');

    for row in &table.rows {
        out.push_str(&format!(
            "{:<24} {:>14.precision$} {:>14.precision$} {:>14.precision$} {:>8} {:>6}\n",
            row.strategy,
            row.total_pnl,
            row.volatility,
            row.max_drawdown,
            row.trading_days,
            row.gap_count,
        ));
    }

    if !table.failures.is_empty() {
        out.push('\n');
        for failure in &table.failures {
            out.push_str(&format!("FAILED {}: {}\n", failure.strategy, failure.error));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{SummaryFailure, SummaryRow};
    use chrono::NaiveDate;

    fn sample_series() -> Vec<PnlPoint> {
        vec![
            PnlPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                daily: 1.234_56,
                cumulative: 1.234_56,
            },
            PnlPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                daily: -0.5,
                cumulative: 0.734_56,
            },
        ]
    }

    fn sample_table() -> SummaryTable {
        SummaryTable {
            rows: vec![SummaryRow {
                strategy: "buy_and_hold".into(),
                total_pnl: 3.0,
                volatility: 1.4142,
                max_drawdown: -1.0,
                trading_days: 2,
                gap_count: 0,
            }],
            failures: vec![SummaryFailure {
                strategy: "rogue".into(),
                error: "policy acted on 'ZZZ'".into(),
            }],
        }
    }

    #[test]
    fn pnl_csv_has_header_and_precision() {
        let csv = export_pnl_csv(&sample_series(), 2).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "date,daily_pnl,cumulative_pnl");
        assert_eq!(lines.next().unwrap(), "2024-01-02,1.23,1.23");
        assert_eq!(lines.next().unwrap(), "2024-01-03,-0.50,0.73");
    }

    #[test]
    fn precision_affects_formatting_only() {
        let series = sample_series();
        let _ = export_pnl_csv(&series, 0).unwrap();
        // The series itself is untouched.
        assert_eq!(series[0].daily, 1.234_56);
    }

    #[test]
    fn summary_csv_lists_rows_in_order() {
        let csv = export_summary_csv(&sample_table(), 2).unwrap();
        assert!(csv.starts_with("strategy,total_pnl,volatility,max_drawdown,trading_days,gap_count"));
        assert!(csv.contains("buy_and_hold,3.00,1.41,-1.00,2,0"));
    }

    #[test]
    fn text_rendering_includes_failures() {
        let text = render_summary_text(&sample_table(), 2);
        assert!(text.contains("buy_and_hold"));
        assert!(text.contains("FAILED rogue"));
    }
}
