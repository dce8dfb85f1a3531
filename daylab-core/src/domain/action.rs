//! ActionSet — per-symbol signed volume deltas decided at one day-phase.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The outcome of one signal policy call: a signed volume delta per symbol.
///
/// Positive deltas buy, negative deltas sell (a short position is a negative
/// quantity, not an error). Backed by a `BTreeMap` so iteration order and
/// serialization are deterministic, which the ledger fingerprint relies on.
///
/// An `ActionSet` is immutable once the engine records it into history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSet {
    deltas: BTreeMap<String, f64>,
}

impl ActionSet {
    /// An empty action set: no trades.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the volume delta for a symbol. A later call for the same symbol
    /// overwrites the earlier one.
    pub fn set(&mut self, symbol: impl Into<String>, delta: f64) {
        self.deltas.insert(symbol.into(), delta);
    }

    /// Builder-style `set`, convenient in policies and tests.
    pub fn with(mut self, symbol: impl Into<String>, delta: f64) -> Self {
        self.set(symbol, delta);
        self
    }

    /// Volume delta for a symbol; 0.0 if the set has no entry for it.
    pub fn delta(&self, symbol: &str) -> f64 {
        self.deltas.get(symbol).copied().unwrap_or(0.0)
    }

    /// Whether the set carries an entry for a symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.deltas.contains_key(symbol)
    }

    /// Iterate entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.deltas.iter().map(|(s, d)| (s.as_str(), *d))
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }
}
