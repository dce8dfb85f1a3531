//! Run configuration — universe, date range, display precision, strategies.
//!
//! Loaded from TOML and validated once before any simulation begins.
//! `precision` controls how many decimal digits reports and CSV exports
//! carry; it never rounds the stored PnL values themselves.

use chrono::NaiveDate;
use daylab_core::engine::EngineConfig;
use daylab_core::policies;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised during configuration load/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(String),

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("empty trading universe")]
    EmptyUniverse,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown strategy '{0}' (valid: {valid})", valid = policies::BUILTIN_NAMES.join(", "))]
    UnknownStrategy(String),
}

/// Serializable configuration for a run or a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Universe of symbols to trade.
    pub universe: Vec<String>,

    /// Backtest start date (inclusive).
    pub start_date: NaiveDate,

    /// Backtest end date (inclusive).
    pub end_date: NaiveDate,

    /// Decimal digits for reported numbers. Formatting only.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Built-in strategy names for batch runs. Empty means "all built-ins".
    #[serde(default)]
    pub strategies: Vec<String>,
}

fn default_precision() -> usize {
    2
}

impl RunConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate without parsing: empty universe, inverted range, and unknown
    /// strategy names are all fatal before any simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        for name in &self.strategies {
            if policies::builtin(name).is_none() {
                return Err(ConfigError::UnknownStrategy(name.clone()));
            }
        }
        Ok(())
    }

    /// The engine-facing slice of this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.start_date, self.end_date)
    }

    /// Deterministic content hash, usable as a run identifier.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// The strategy names to run: the configured list, or every built-in
    /// when the list is empty.
    pub fn strategy_names(&self) -> Vec<String> {
        if self.strategies.is_empty() {
            policies::BUILTIN_NAMES.iter().map(|s| s.to_string()).collect()
        } else {
            self.strategies.clone()
        }
    }
}

/// Default US large-cap trading universe (Dow 30 constituents).
pub fn default_universe() -> Vec<String> {
    [
        "AAPL", "AXP", "BA", "CAT", "CVX", "CSCO", "DIS", "DD", "XOM", "GE", "GS", "HD", "IBM",
        "INTC", "JNJ", "JPM", "KO", "MCD", "MMM", "MRK", "MSFT", "NKE", "PFE", "PG", "TRV", "UTX",
        "UNH", "VZ", "V", "WMT",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
