//! Built-in example policies.
//!
//! These are callers of the engine, not part of it — each is an ordinary
//! function matching the [`crate::signal::SignalPolicy`] signature. New
//! strategies are added by writing a new function, never by touching the
//! engine.

use crate::domain::ActionSet;
use crate::signal::StrategySpec;
use crate::store::QuoteStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &["hold", "buy_and_hold", "overnight_reversion"];

/// Look up a built-in strategy by name.
pub fn builtin(name: &str) -> Option<StrategySpec> {
    match name {
        "hold" => Some(StrategySpec::new("hold", hold, hold)),
        "buy_and_hold" => Some(StrategySpec::new("buy_and_hold", buy_and_hold, hold)),
        "overnight_reversion" => Some(StrategySpec::new(
            "overnight_reversion",
            overnight_reversion,
            close_daily_positions,
        )),
        _ => None,
    }
}

/// Never trades.
pub fn hold(
    _day: NaiveDate,
    _quotes: &QuoteStore,
    _open_history: &[ActionSet],
    _close_history: &[ActionSet],
) -> ActionSet {
    ActionSet::new()
}

/// Buy one unit of every universe symbol at the first open, then hold.
pub fn buy_and_hold(
    _day: NaiveDate,
    quotes: &QuoteStore,
    open_history: &[ActionSet],
    _close_history: &[ActionSet],
) -> ActionSet {
    if !open_history.is_empty() {
        return ActionSet::new();
    }
    let mut actions = ActionSet::new();
    for symbol in quotes.universe() {
        actions.set(symbol.clone(), 1.0);
    }
    actions
}

/// Close signal that flattens whatever the run has accumulated so far,
/// including this day's open actions.
///
/// Works purely from the recorded histories, so a fill the engine dropped
/// for a data gap is retried on the next quoted day.
pub fn close_daily_positions(
    _day: NaiveDate,
    _quotes: &QuoteStore,
    open_history: &[ActionSet],
    close_history: &[ActionSet],
) -> ActionSet {
    let mut net: BTreeMap<String, f64> = BTreeMap::new();
    for actions in open_history.iter().chain(close_history.iter()) {
        for (symbol, delta) in actions.iter() {
            *net.entry(symbol.to_string()).or_default() += delta;
        }
    }

    let mut out = ActionSet::new();
    for (symbol, quantity) in net {
        if quantity != 0.0 {
            out.set(symbol, -quantity);
        }
    }
    out
}

/// Overnight mean reversion at the open: rank yesterday's close-to-close log
/// returns, buy one unit of the weakest third (only if it actually fell) and
/// short one unit of the strongest third (only if it actually rose).
///
/// Reads only quotes dated strictly before `day`.
pub fn overnight_reversion(
    day: NaiveDate,
    quotes: &QuoteStore,
    _open_history: &[ActionSet],
    _close_history: &[ActionSet],
) -> ActionSet {
    let mut returns: Vec<(String, f64)> = Vec::new();
    for symbol in quotes.universe() {
        let history = quotes.quotes_before(symbol, day, 2);
        if let [prev, last] = history[..] {
            let r = (last.close / prev.close).ln();
            if r.is_finite() {
                returns.push((symbol.clone(), r));
            }
        }
    }

    if returns.len() < 3 {
        return ActionSet::new();
    }
    returns.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let third = returns.len() / 3;
    let mut actions = ActionSet::new();
    for (symbol, r) in &returns[..third] {
        if *r < 0.0 {
            actions.set(symbol.clone(), 1.0);
        }
    }
    for (symbol, r) in &returns[returns.len() - third..] {
        if *r > 0.0 {
            actions.set(symbol.clone(), -1.0);
        }
    }
    actions
}
