//! CSV cache layer — one file per symbol plus a metadata sidecar.
//!
//! Layout: `{cache_dir}/{SYMBOL}.csv` and `{cache_dir}/{SYMBOL}.meta.json`
//!
//! Writes are atomic (write to .tmp, rename into place). Loads validate each
//! row's OHLC sanity and drop rows that fail, so a corrupt line degrades to a
//! data gap instead of poisoning a run.

use super::provider::DataError;
use crate::domain::Quote;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub row_count: usize,
    pub data_hash: String,
    pub source: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// One CSV row. The symbol lives in the file name, not the row.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// The CSV quote cache.
pub struct CsvCache {
    cache_dir: PathBuf,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{symbol}.csv"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{symbol}.meta.json"))
    }

    /// Write quotes for a symbol, replacing any previous cache entry.
    pub fn write(&self, symbol: &str, quotes: &[Quote]) -> Result<(), DataError> {
        if quotes.is_empty() {
            return Err(DataError::CacheError("no quotes to cache".into()));
        }

        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let mut sorted: Vec<&Quote> = quotes.iter().collect();
        sorted.sort_by_key(|q| q.date);

        let mut wtr = csv::Writer::from_writer(Vec::new());
        for q in &sorted {
            wtr.serialize(CacheRow {
                date: q.date,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .map_err(|e| DataError::CacheError(format!("csv serialize: {e}")))?;
        }
        let data = wtr
            .into_inner()
            .map_err(|e| DataError::CacheError(format!("csv flush: {e}")))?;

        // Atomic write: .tmp then rename.
        let path = self.csv_path(symbol);
        let tmp_path = path.with_extension("csv.tmp");
        fs::write(&tmp_path, &data)
            .map_err(|e| DataError::CacheError(format!("cache write: {e}")))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: sorted.first().map(|q| q.date).unwrap_or_default(),
            end_date: sorted.last().map(|q| q.date).unwrap_or_default(),
            row_count: sorted.len(),
            data_hash: blake3::hash(&data).to_hex().to_string(),
            source: "ingest".to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load all cached quotes for a symbol, sorted by date ascending.
    pub fn load(&self, symbol: &str) -> Result<Vec<Quote>, DataError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| DataError::CacheError(format!("cache open: {e}")))?;

        let mut quotes = Vec::new();
        for row in rdr.deserialize::<CacheRow>() {
            let row = row.map_err(|e| DataError::CacheError(format!("cache row: {e}")))?;
            let q = Quote {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            };
            if q.is_sane() {
                quotes.push(q);
            }
        }

        if quotes.is_empty() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        quotes.sort_by_key(|q| q.date);
        Ok(quotes)
    }

    /// Metadata for a cached symbol, if present and parseable.
    pub fn meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Whether the cache already spans the requested range for a symbol.
    pub fn covers_range(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.meta(symbol)
            .is_some_and(|m| m.start_date <= start && m.end_date >= end)
    }
}
