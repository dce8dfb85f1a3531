//! Integration tests for batch summaries and export.

use chrono::NaiveDate;
use daylab_core::data::synthetic_store;
use daylab_core::domain::ActionSet;
use daylab_core::engine::EngineConfig;
use daylab_core::policies::{builtin, hold};
use daylab_core::signal::StrategySpec;
use daylab_core::store::QuoteStore;
use daylab_runner::{export_summary_csv, render_summary_text, summarize, write_summary_csv};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_store() -> QuoteStore {
    let universe: Vec<String> = ["AAA", "BBB", "CCC"].iter().map(|s| s.to_string()).collect();
    synthetic_store(&universe, date(2024, 1, 1), date(2024, 3, 29), 7)
}

fn test_config() -> EngineConfig {
    EngineConfig::new(date(2024, 1, 1), date(2024, 3, 29))
}

fn builtin_specs(names: &[&str]) -> Vec<StrategySpec> {
    names.iter().map(|n| builtin(n).unwrap()).collect()
}

#[test]
fn one_row_per_spec_in_supplied_order() {
    let store = test_store();
    let specs = builtin_specs(&["overnight_reversion", "hold", "buy_and_hold"]);

    let table = summarize(&specs, &store, &test_config());

    assert!(table.is_clean());
    assert_eq!(table.rows.len(), 3);
    // Caller's order, not alphabetical and not metric-sorted.
    let names: Vec<&str> = table.rows.iter().map(|r| r.strategy.as_str()).collect();
    assert_eq!(names, vec!["overnight_reversion", "hold", "buy_and_hold"]);
}

#[test]
fn hold_row_is_all_zero() {
    let store = test_store();
    let specs = builtin_specs(&["hold"]);

    let table = summarize(&specs, &store, &test_config());
    let row = &table.rows[0];
    assert_eq!(row.total_pnl, 0.0);
    assert_eq!(row.volatility, 0.0);
    assert_eq!(row.max_drawdown, 0.0);
    assert!(row.trading_days > 0);
}

#[test]
fn runs_are_isolated_and_repeatable() {
    let store = test_store();
    let specs = builtin_specs(&["buy_and_hold", "overnight_reversion"]);

    // Two batches over the same store: every figure must repeat exactly.
    // A shared position book or ledger between runs would break this.
    let a = summarize(&specs, &store, &test_config());
    let b = summarize(&specs, &store, &test_config());

    assert_eq!(a.rows.len(), b.rows.len());
    for (ra, rb) in a.rows.iter().zip(&b.rows) {
        assert_eq!(ra.strategy, rb.strategy);
        assert_eq!(ra.total_pnl, rb.total_pnl);
        assert_eq!(ra.volatility, rb.volatility);
        assert_eq!(ra.max_drawdown, rb.max_drawdown);
    }

    // A single-spec batch of buy_and_hold matches its figures from the mixed
    // batch: siblings in a batch cannot influence each other.
    let solo = summarize(&builtin_specs(&["buy_and_hold"]), &store, &test_config());
    assert_eq!(solo.rows[0].total_pnl, a.rows[0].total_pnl);
}

#[test]
fn failed_spec_is_reported_without_losing_other_rows() {
    let store = test_store();

    let rogue_open = |_day: NaiveDate,
                      _quotes: &QuoteStore,
                      _open: &[ActionSet],
                      _close: &[ActionSet]| ActionSet::new().with("ZZZ", 1.0);

    let specs = vec![
        builtin("hold").unwrap(),
        StrategySpec::new("rogue", rogue_open, hold),
        builtin("buy_and_hold").unwrap(),
    ];

    let table = summarize(&specs, &store, &test_config());

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].strategy, "hold");
    assert_eq!(table.rows[1].strategy, "buy_and_hold");

    assert_eq!(table.failures.len(), 1);
    assert_eq!(table.failures[0].strategy, "rogue");
    assert!(table.failures[0].error.contains("ZZZ"));
    assert!(!table.is_clean());
}

#[test]
fn summary_exports_to_csv_and_text() {
    let store = test_store();
    let specs = builtin_specs(&["hold", "buy_and_hold"]);
    let table = summarize(&specs, &store, &test_config());

    let csv = export_summary_csv(&table, 2).unwrap();
    assert!(csv.lines().count() >= 3); // header + 2 rows
    assert!(csv.contains("hold"));

    let text = render_summary_text(&table, 2);
    assert!(text.contains("Strategy"));
    assert!(text.contains("buy_and_hold"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    write_summary_csv(&path, &table, 2).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, csv);
}
