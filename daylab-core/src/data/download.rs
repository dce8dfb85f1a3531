//! Download orchestrator — multi-symbol fetches with progress reporting.

use super::cache::CsvCache;
use super::provider::{DataError, DataProvider, DownloadProgress};
use chrono::NaiveDate;

/// Download multiple symbols and cache each one.
///
/// Failures are per-symbol: one bad symbol never aborts the rest of the
/// batch. Returns a summary of successes and failures.
pub fn download_symbols(
    provider: &dyn DataProvider,
    cache: &CsvCache,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    force: bool,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let total = symbols.len();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        // Skip if cache is fresh and not forcing
        if !force && cache.covers_range(symbol, start, end) {
            progress.on_complete(symbol, i, total, &Ok(()));
            succeeded += 1;
            continue;
        }

        let result = download_single(provider, cache, symbol, start, end);
        progress.on_complete(symbol, i, total, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                errors.push((symbol.to_string(), e));
                failed += 1;
            }
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    DownloadSummary {
        total,
        succeeded,
        failed,
        errors,
    }
}

/// Download a single symbol: fetch → cache.
fn download_single(
    provider: &dyn DataProvider,
    cache: &CsvCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), DataError> {
    let fetch_result = provider.fetch(symbol, start, end)?;
    cache.write(symbol, &fetch_result.quotes)?;
    Ok(())
}

/// Summary of a batch download operation.
#[derive(Debug)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::provider::{DataSource, FetchResult};
    use crate::domain::Quote;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider;

    impl DataProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(
            &self,
            symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            if symbol == "BAD" {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.into(),
                });
            }
            Ok(FetchResult {
                symbol: symbol.to_string(),
                quotes: vec![Quote {
                    symbol: symbol.to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.5,
                    volume: 1_000,
                }],
                source: DataSource::Synthetic,
            })
        }
    }

    struct SilentProgress(AtomicUsize);

    impl DownloadProgress for SilentProgress {
        fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
        fn on_complete(
            &self,
            _symbol: &str,
            _index: usize,
            _total: usize,
            _result: &Result<(), DataError>,
        ) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
    }

    #[test]
    fn bad_symbol_does_not_abort_the_batch() {
        let dir = std::env::temp_dir().join(format!("daylab-dl-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let cache = CsvCache::new(&dir);
        let progress = SilentProgress(AtomicUsize::new(0));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let summary = download_symbols(
            &FixedProvider,
            &cache,
            &["AAA", "BAD", "CCC"],
            start,
            end,
            false,
            &progress,
        );

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.errors[0].0, "BAD");
        assert_eq!(progress.0.load(Ordering::SeqCst), 3);

        // The good symbols landed in the cache.
        assert!(cache.load("AAA").is_ok());
        assert!(cache.load("CCC").is_ok());
    }
}
