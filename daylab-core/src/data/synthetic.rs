//! Deterministic synthetic quotes for tests, benches, and offline runs.

use crate::domain::Quote;
use crate::store::QuoteStore;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a seeded random-walk quote series for one symbol, weekdays only.
///
/// The same (symbol, range, seed) always produces the same series, so tests
/// and benches are reproducible. Every generated quote passes
/// [`Quote::is_sane`].
pub fn synthetic_quotes(symbol: &str, start: NaiveDate, end: NaiveDate, seed: u64) -> Vec<Quote> {
    // Mix the symbol into the seed so each series walks differently.
    let hash = blake3::hash(symbol.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from_le_bytes(bytes));

    let mut quotes = Vec::new();
    let mut prev_close: f64 = 100.0 * rng.gen_range(0.5..2.0);

    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            let open = prev_close * (1.0 + rng.gen_range(-0.005..0.005));
            let close = open * (1.0 + rng.gen_range(-0.02..0.02));
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.004));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.004));

            quotes.push(Quote {
                symbol: symbol.to_string(),
                date: day,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(100_000..5_000_000),
            });
            prev_close = close;
        }
        day += Duration::days(1);
    }

    quotes
}

/// Build a fully-populated store for a universe of synthetic series.
pub fn synthetic_store(
    universe: &[String],
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
) -> QuoteStore {
    let mut store = QuoteStore::new(universe.to_vec());
    for symbol in universe {
        for quote in synthetic_quotes(symbol, start, end, seed) {
            store.insert(quote);
        }
    }
    store
}
