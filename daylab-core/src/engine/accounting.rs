//! Per-phase accounting: quote gathering, action validation, settlement.

use crate::domain::{ActionSet, GapRecord, Phase, PositionBook};
use crate::engine::EngineError;
use crate::store::QuoteStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Gather this phase's price per universe symbol, recording a gap for every
/// symbol with no quote on `day`. Quoted symbols also refresh `last_prices`,
/// the marks used for portfolio valuation.
pub(crate) fn phase_prices(
    store: &QuoteStore,
    day: NaiveDate,
    phase: Phase,
    last_prices: &mut BTreeMap<String, f64>,
) -> (BTreeMap<String, f64>, Vec<GapRecord>) {
    let mut prices = BTreeMap::new();
    let mut gaps = Vec::new();

    for symbol in store.universe() {
        match store.quote(symbol, day) {
            Ok(quote) => {
                let price = match phase {
                    Phase::Open => quote.open,
                    Phase::Close => quote.close,
                };
                prices.insert(symbol.clone(), price);
                last_prices.insert(symbol.clone(), price);
            }
            Err(_) => gaps.push(GapRecord {
                symbol: symbol.clone(),
                phase,
            }),
        }
    }

    (prices, gaps)
}

/// Reject actions that violate the policy contract: a symbol outside the
/// universe, or a non-finite volume. Both indicate a programming error in the
/// policy and abort the run.
pub(crate) fn check_actions(
    actions: &ActionSet,
    store: &QuoteStore,
    date: NaiveDate,
    phase: Phase,
) -> Result<(), EngineError> {
    for (symbol, delta) in actions.iter() {
        if !store.in_universe(symbol) {
            return Err(EngineError::UnknownActionSymbol {
                symbol: symbol.to_string(),
                date,
                phase,
            });
        }
        if !delta.is_finite() {
            return Err(EngineError::NonFiniteVolume {
                symbol: symbol.to_string(),
                volume: delta,
                date,
                phase,
            });
        }
    }
    Ok(())
}

/// Fill the desired actions against the available phase prices.
///
/// Entries without a price (data gap) and zero deltas are dropped; everything
/// else moves position and cash at the quoted price. Returns the actions that
/// actually filled — this is what the ledger and the policy histories record.
pub(crate) fn settle(
    book: &mut PositionBook,
    desired: &ActionSet,
    prices: &BTreeMap<String, f64>,
) -> ActionSet {
    let mut recorded = ActionSet::new();
    for (symbol, delta) in desired.iter() {
        if delta == 0.0 {
            continue;
        }
        if let Some(price) = prices.get(symbol) {
            book.trade(symbol, delta, *price);
            recorded.set(symbol, delta);
        }
    }
    recorded
}

/// The close-all action set for whatever is still open: one opposite-signed
/// entry per position.
pub(crate) fn liquidation_for(book: &PositionBook) -> ActionSet {
    let mut actions = ActionSet::new();
    for (symbol, quantity) in book.open_positions() {
        actions.set(symbol, -quantity);
    }
    actions
}
