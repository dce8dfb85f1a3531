//! Signal policy interface — strategies as ordinary functions.
//!
//! A strategy is a pair of decision functions, one evaluated at market open
//! and one at market close. The engine is generic over anything implementing
//! [`SignalPolicy`]; the blanket impl below means a plain `fn` or closure with
//! the right signature is already a policy — no subclassing, no registration.

use crate::domain::ActionSet;
use crate::store::QuoteStore;
use chrono::NaiveDate;

/// One decision function of a strategy.
///
/// Contract:
/// - Deterministic given identical inputs: no hidden state, no randomness.
///   Re-running the same policy over the same store must yield an identical
///   ledger.
/// - May return an empty [`ActionSet`] (no trades) on any day.
/// - Must never read quotes dated after `day` (no lookahead). The engine
///   cannot detect this mechanically; it is covered by tests on the supplied
///   policies.
///
/// The histories are the actions previously *recorded* by the engine, oldest
/// first. They are read-only views: a policy can look back at its own prior
/// decisions but can never rewrite them. At the open phase of day N the open
/// history holds days 1..N-1; at the close phase it already includes day N's
/// open actions.
pub trait SignalPolicy: Send + Sync {
    fn decide(
        &self,
        day: NaiveDate,
        quotes: &QuoteStore,
        open_history: &[ActionSet],
        close_history: &[ActionSet],
    ) -> ActionSet;
}

impl<F> SignalPolicy for F
where
    F: Fn(NaiveDate, &QuoteStore, &[ActionSet], &[ActionSet]) -> ActionSet + Send + Sync,
{
    fn decide(
        &self,
        day: NaiveDate,
        quotes: &QuoteStore,
        open_history: &[ActionSet],
        close_history: &[ActionSet],
    ) -> ActionSet {
        self(day, quotes, open_history, close_history)
    }
}

/// A named strategy for batch runs: (name, open policy, close policy).
///
/// Immutable once built. Each spec in a batch gets its own fresh engine
/// state; nothing is shared between runs.
pub struct StrategySpec {
    name: String,
    open: Box<dyn SignalPolicy>,
    close: Box<dyn SignalPolicy>,
}

impl StrategySpec {
    pub fn new(
        name: impl Into<String>,
        open: impl SignalPolicy + 'static,
        close: impl SignalPolicy + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            open: Box::new(open),
            close: Box::new(close),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn open_policy(&self) -> &dyn SignalPolicy {
        self.open.as_ref()
    }

    pub fn close_policy(&self) -> &dyn SignalPolicy {
        self.close.as_ref()
    }
}

impl std::fmt::Debug for StrategySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategySpec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_trade(
        _day: NaiveDate,
        _quotes: &QuoteStore,
        _open: &[ActionSet],
        _close: &[ActionSet],
    ) -> ActionSet {
        ActionSet::new()
    }

    #[test]
    fn fn_items_are_policies() {
        let spec = StrategySpec::new("noop", never_trade, never_trade);
        assert_eq!(spec.name(), "noop");

        let store = QuoteStore::new(vec!["SPY".into()]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let actions = spec.open_policy().decide(day, &store, &[], &[]);
        assert!(actions.is_empty());
    }

    #[test]
    fn closures_are_policies() {
        let unit = 3.0;
        let buy_spy = move |_day: NaiveDate,
                            _quotes: &QuoteStore,
                            _open: &[ActionSet],
                            _close: &[ActionSet]| {
            ActionSet::new().with("SPY", unit)
        };
        let spec = StrategySpec::new("buy_spy", buy_spy, never_trade);

        let store = QuoteStore::new(vec!["SPY".into()]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let actions = spec.open_policy().decide(day, &store, &[], &[]);
        assert_eq!(actions.delta("SPY"), 3.0);
    }
}
