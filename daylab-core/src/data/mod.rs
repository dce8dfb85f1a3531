//! Data acquisition: provider trait, Yahoo fetch, CSV cache, synthetic quotes.

pub mod cache;
pub mod download;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use cache::{CacheMeta, CsvCache};
pub use download::{download_symbols, DownloadSummary};
pub use provider::{
    DataError, DataProvider, DataSource, DownloadProgress, FetchResult, StdoutProgress,
};
pub use synthetic::{synthetic_quotes, synthetic_store};
pub use yahoo::YahooProvider;

use crate::store::QuoteStore;
use chrono::NaiveDate;

/// Build a QuoteStore for a universe from cached data, keeping only quotes
/// inside the inclusive date range.
///
/// Every universe symbol must have a cache entry; symbols whose cached data
/// misses the range entirely surface later as an engine configuration error.
pub fn load_store(
    cache: &CsvCache,
    universe: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<QuoteStore, DataError> {
    let mut store = QuoteStore::new(universe.to_vec());
    for symbol in universe {
        for quote in cache.load(symbol)? {
            if quote.date >= start && quote.date <= end {
                store.insert(quote);
            }
        }
    }
    Ok(store)
}
