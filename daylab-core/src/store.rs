//! QuoteStore — date-ordered daily quotes for an explicit trading universe.
//!
//! The store is populated once (from cache, download, or synthetic data) and
//! is read-only for the remainder of a run. The universe is a constructor
//! argument — there is no process-wide default.

use crate::domain::Quote;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Structured error types for store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no quote for {symbol} on {date}")]
    MissingData { symbol: String, date: NaiveDate },

    #[error("symbol '{0}' is not in the trading universe")]
    UnknownSymbol(String),
}

/// Per-symbol daily quote series with ordered lookup.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    universe: Vec<String>,
    series: BTreeMap<String, BTreeMap<NaiveDate, Quote>>,
}

impl QuoteStore {
    /// Create an empty store for an explicit universe.
    pub fn new(universe: Vec<String>) -> Self {
        let series = universe
            .iter()
            .map(|s| (s.clone(), BTreeMap::new()))
            .collect();
        Self { universe, series }
    }

    /// The configured universe, in the caller's order.
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn in_universe(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    /// Insert a quote, replacing any existing quote for the same
    /// (symbol, date). Quotes for symbols outside the universe are ignored;
    /// returns whether the quote was stored.
    pub fn insert(&mut self, quote: Quote) -> bool {
        match self.series.get_mut(&quote.symbol) {
            Some(days) => {
                days.insert(quote.date, quote);
                true
            }
            None => false,
        }
    }

    /// Look up the quote for a symbol on a day.
    pub fn quote(&self, symbol: &str, day: NaiveDate) -> Result<&Quote, StoreError> {
        let days = self
            .series
            .get(symbol)
            .ok_or_else(|| StoreError::UnknownSymbol(symbol.to_string()))?;
        days.get(&day).ok_or_else(|| StoreError::MissingData {
            symbol: symbol.to_string(),
            date: day,
        })
    }

    /// Ascending, de-duplicated trading days in the inclusive range: the
    /// union of days with quotes across the whole universe.
    pub fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        for series in self.series.values() {
            days.extend(series.range(start..=end).map(|(d, _)| *d));
        }
        days.into_iter().collect()
    }

    /// Whether a symbol has at least one quote in the inclusive range.
    pub fn has_data_in_range(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.series
            .get(symbol)
            .is_some_and(|days| days.range(start..=end).next().is_some())
    }

    /// The most recent close on or before `day`, if any.
    pub fn last_close_on_or_before(&self, symbol: &str, day: NaiveDate) -> Option<f64> {
        self.series
            .get(symbol)?
            .range(..=day)
            .next_back()
            .map(|(_, q)| q.close)
    }

    /// The last `count` quotes strictly before `day`, in ascending date order.
    pub fn quotes_before(&self, symbol: &str, day: NaiveDate, count: usize) -> Vec<&Quote> {
        let Some(days) = self.series.get(symbol) else {
            return Vec::new();
        };
        let mut quotes: Vec<&Quote> = days.range(..day).rev().take(count).map(|(_, q)| q).collect();
        quotes.reverse();
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quote(symbol: &str, day: NaiveDate, close: f64) -> Quote {
        Quote {
            symbol: symbol.into(),
            date: day,
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    fn sample_store() -> QuoteStore {
        let mut store = QuoteStore::new(vec!["AAA".into(), "BBB".into()]);
        store.insert(quote("AAA", date(2024, 1, 2), 100.0));
        store.insert(quote("AAA", date(2024, 1, 3), 101.0));
        store.insert(quote("BBB", date(2024, 1, 3), 50.0));
        store.insert(quote("BBB", date(2024, 1, 4), 51.0));
        store
    }

    #[test]
    fn lookup_returns_quote() {
        let store = sample_store();
        let q = store.quote("AAA", date(2024, 1, 2)).unwrap();
        assert_eq!(q.close, 100.0);
    }

    #[test]
    fn missing_day_is_missing_data() {
        let store = sample_store();
        let err = store.quote("AAA", date(2024, 1, 4)).unwrap_err();
        assert!(matches!(err, StoreError::MissingData { .. }));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let store = sample_store();
        let err = store.quote("ZZZ", date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownSymbol(_)));
    }

    #[test]
    fn out_of_universe_insert_is_ignored() {
        let mut store = sample_store();
        assert!(!store.insert(quote("ZZZ", date(2024, 1, 2), 10.0)));
        assert!(!store.in_universe("ZZZ"));
    }

    #[test]
    fn trading_days_are_union_across_universe() {
        let store = sample_store();
        let days = store.trading_days(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(
            days,
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]
        );
    }

    #[test]
    fn trading_days_respect_range() {
        let store = sample_store();
        let days = store.trading_days(date(2024, 1, 3), date(2024, 1, 3));
        assert_eq!(days, vec![date(2024, 1, 3)]);
    }

    #[test]
    fn last_close_spans_gaps() {
        let store = sample_store();
        // AAA has no quote on Jan 4; the last available close is Jan 3's.
        assert_eq!(
            store.last_close_on_or_before("AAA", date(2024, 1, 4)),
            Some(101.0)
        );
        assert_eq!(store.last_close_on_or_before("AAA", date(2024, 1, 1)), None);
    }

    #[test]
    fn quotes_before_is_ascending_and_excludes_day() {
        let store = sample_store();
        let quotes = store.quotes_before("AAA", date(2024, 1, 4), 5);
        let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
        assert_eq!(closes, vec![100.0, 101.0]);

        let quotes = store.quotes_before("AAA", date(2024, 1, 3), 5);
        let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
        assert_eq!(closes, vec![100.0]);
    }

    #[test]
    fn has_data_in_range_checks_window() {
        let store = sample_store();
        assert!(store.has_data_in_range("AAA", date(2024, 1, 1), date(2024, 1, 2)));
        assert!(!store.has_data_in_range("AAA", date(2024, 1, 4), date(2024, 1, 10)));
    }
}
