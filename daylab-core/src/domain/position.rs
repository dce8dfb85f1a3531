//! PositionBook — running per-symbol holdings plus a cash ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-run position and cash state.
///
/// Scoped to a single backtest run: created at the start of `backtest()`,
/// owned exclusively by it, and never shared across strategies in a batch.
/// Cash starts at zero, so the portfolio value *is* the cumulative PnL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionBook {
    cash: f64,
    quantities: BTreeMap<String, f64>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Signed quantity held for a symbol; 0.0 when flat.
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.quantities.get(symbol).copied().unwrap_or(0.0)
    }

    /// Apply one fill: quantity moves by `delta`, cash moves by the opposite
    /// notional (a buy spends cash, a sell or short-sell raises it).
    pub fn trade(&mut self, symbol: &str, delta: f64, price: f64) {
        let qty = self.quantities.entry(symbol.to_string()).or_insert(0.0);
        *qty += delta;
        self.cash -= delta * price;
        // Flat entries are dropped so serialized state stays canonical.
        if *qty == 0.0 {
            self.quantities.remove(symbol);
        }
    }

    /// Iterate open (non-zero) positions in symbol order.
    pub fn open_positions(&self) -> impl Iterator<Item = (&str, f64)> {
        self.quantities.iter().map(|(s, q)| (s.as_str(), *q))
    }

    pub fn is_flat(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Portfolio value: cash + sum of position quantity times the last
    /// available price. A position can only exist for a symbol that has
    /// traded at a known price, so a missing entry contributes nothing.
    pub fn value(&self, last_prices: &BTreeMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .quantities
            .iter()
            .map(|(sym, qty)| qty * last_prices.get(sym).copied().unwrap_or(0.0))
            .sum();
        self.cash + position_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat_with_zero_cash() {
        let book = PositionBook::new();
        assert!(book.is_flat());
        assert_eq!(book.cash(), 0.0);
        assert_eq!(book.value(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn buy_moves_cash_down_and_quantity_up() {
        let mut book = PositionBook::new();
        book.trade("SPY", 2.0, 100.0);
        assert_eq!(book.quantity("SPY"), 2.0);
        assert_eq!(book.cash(), -200.0);
    }

    #[test]
    fn short_sell_raises_cash() {
        let mut book = PositionBook::new();
        book.trade("SPY", -1.0, 100.0);
        assert_eq!(book.quantity("SPY"), -1.0);
        assert_eq!(book.cash(), 100.0);
    }

    #[test]
    fn round_trip_returns_to_flat() {
        let mut book = PositionBook::new();
        book.trade("SPY", 1.0, 100.0);
        book.trade("SPY", -1.0, 103.0);
        assert!(book.is_flat());
        assert_eq!(book.cash(), 3.0);
    }

    #[test]
    fn value_marks_positions_at_last_price() {
        let mut book = PositionBook::new();
        book.trade("SPY", 1.0, 100.0);
        let mut prices = BTreeMap::new();
        prices.insert("SPY".to_string(), 101.0);
        // -100 cash + 1 * 101
        assert_eq!(book.value(&prices), 1.0);
    }
}
