//! DayLab CLI — download quotes, run a single backtest, compare strategies.
//!
//! Commands:
//! - `download` — fetch daily quotes from Yahoo Finance into the CSV cache
//! - `run` — backtest one built-in strategy and print/export its PnL series
//! - `summary` — run a batch of strategies and print/export the comparison

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use daylab_core::data::{download_symbols, load_store, synthetic_store, CsvCache, StdoutProgress, YahooProvider};
use daylab_core::engine::backtest;
use daylab_core::policies::{builtin, BUILTIN_NAMES};
use daylab_core::signal::StrategySpec;
use daylab_core::store::QuoteStore;
use daylab_runner::metrics::{daily_volatility, max_drawdown, total_pnl};
use daylab_runner::{
    default_universe, pnl_series, render_summary_text, summarize, write_pnl_csv,
    write_summary_csv, RunConfig,
};

#[derive(Parser)]
#[command(name = "daylab", about = "DayLab CLI — day-trading strategy backtester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily quotes from Yahoo Finance into the CSV cache.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL). Defaults to the
        /// built-in US large-cap universe.
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Backtest one built-in strategy over cached (or synthetic) quotes.
    Run {
        /// Strategy name: hold, buy_and_hold, overnight_reversion.
        #[arg(long)]
        strategy: String,

        /// Path to a TOML run config; replaces the universe/date/precision
        /// flags below.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to trade. Defaults to the built-in universe.
        #[arg(long)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Decimal digits in printed/exported numbers.
        #[arg(long, default_value_t = 2)]
        precision: usize,

        /// Use deterministic synthetic quotes instead of the cache.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Write the PnL series to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a batch of strategies and tabulate the comparison.
    Summary {
        /// Strategy names. Defaults to every built-in.
        #[arg(long)]
        strategies: Vec<String>,

        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to trade. Defaults to the built-in universe.
        #[arg(long)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Decimal digits in printed/exported numbers.
        #[arg(long, default_value_t = 2)]
        precision: usize,

        /// Use deterministic synthetic quotes instead of the cache.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Write the summary table to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, start, end, force, cache_dir),
        Commands::Run {
            strategy,
            config,
            symbols,
            start,
            end,
            precision,
            synthetic,
            cache_dir,
            output,
        } => {
            let run_config = resolve_config(config, symbols, start, end, precision, vec![])?;
            run_single(&strategy, &run_config, synthetic, &cache_dir, output)
        }
        Commands::Summary {
            strategies,
            config,
            symbols,
            start,
            end,
            precision,
            synthetic,
            cache_dir,
            output,
        } => {
            let run_config = resolve_config(config, symbols, start, end, precision, strategies)?;
            run_summary(&run_config, synthetic, &cache_dir, output)
        }
    }
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let symbols = if symbols.is_empty() {
        default_universe()
    } else {
        symbols
    };
    let (start_date, end_date) = resolve_dates(start.as_deref(), end.as_deref())?;

    let provider = YahooProvider::new();
    let cache = CsvCache::new(cache_dir);
    let progress = StdoutProgress;

    let sym_refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
    let summary = download_symbols(
        &provider, &cache, &sym_refs, start_date, end_date, force, &progress,
    );

    if !summary.all_succeeded() {
        for (sym, err) in &summary.errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_single(
    strategy: &str,
    config: &RunConfig,
    synthetic: bool,
    cache_dir: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let Some(spec) = builtin(strategy) else {
        bail!(
            "unknown strategy '{strategy}'. Valid: {}",
            BUILTIN_NAMES.join(", ")
        );
    };

    let store = build_store(config, synthetic, cache_dir)?;
    let result = backtest(
        &store,
        &config.engine_config(),
        spec.open_policy(),
        spec.close_policy(),
    )
    .context("backtest failed")?;

    let series = pnl_series(&result.ledger);
    print_run(&spec, config, result.day_count, result.gap_count, &series, config.precision);

    if let Some(path) = output {
        write_pnl_csv(&path, &series, config.precision)?;
        println!("PnL series saved to: {}", path.display());
    }

    Ok(())
}

fn run_summary(
    config: &RunConfig,
    synthetic: bool,
    cache_dir: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut specs: Vec<StrategySpec> = Vec::new();
    for name in config.strategy_names() {
        match builtin(&name) {
            Some(spec) => specs.push(spec),
            None => bail!(
                "unknown strategy '{name}'. Valid: {}",
                BUILTIN_NAMES.join(", ")
            ),
        }
    }

    let store = build_store(config, synthetic, cache_dir)?;
    let table = summarize(&specs, &store, &config.engine_config());

    println!();
    print!("{}", render_summary_text(&table, config.precision));

    if let Some(path) = output {
        write_summary_csv(&path, &table, config.precision)?;
        println!("\nSummary saved to: {}", path.display());
    }

    if !table.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

/// Build a RunConfig from a TOML file or from flags + defaults.
fn resolve_config(
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    precision: usize,
    strategies: Vec<String>,
) -> Result<RunConfig> {
    if let Some(path) = config_path {
        return RunConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let universe = if symbols.is_empty() {
        default_universe()
    } else {
        symbols
    };
    let (start_date, end_date) = resolve_dates(start.as_deref(), end.as_deref())?;

    let config = RunConfig {
        universe,
        start_date,
        end_date,
        precision,
        strategies,
    };
    config.validate()?;
    Ok(config)
}

fn resolve_dates(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let end_date = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let start_date = start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| end_date - chrono::Duration::days(365));

    Ok((start_date, end_date))
}

fn build_store(config: &RunConfig, synthetic: bool, cache_dir: &Path) -> Result<QuoteStore> {
    if synthetic {
        // Seeded from the config hash so repeated invocations agree.
        let seed = u64::from_le_bytes(
            config.run_id().as_bytes()[..8]
                .try_into()
                .expect("run id is at least 8 bytes"),
        );
        return Ok(synthetic_store(
            &config.universe,
            config.start_date,
            config.end_date,
            seed,
        ));
    }

    let cache = CsvCache::new(cache_dir);
    load_store(&cache, &config.universe, config.start_date, config.end_date)
        .context("failed to load quotes from cache (run `daylab download` first)")
}

fn print_run(
    spec: &StrategySpec,
    config: &RunConfig,
    day_count: usize,
    gap_count: usize,
    series: &[daylab_runner::PnlPoint],
    precision: usize,
) {
    println!();
    println!("=== Backtest Result ===");
    println!("Strategy:       {}", spec.name());
    println!("Symbols:        {}", config.universe.len());
    println!(
        "Period:         {} to {}",
        config.start_date, config.end_date
    );
    println!("Trading days:   {day_count}");
    println!("Data gaps:      {gap_count}");
    println!();
    println!("--- Performance ---");
    println!("Total PnL:      {:.precision$}", total_pnl(series));
    println!("Volatility:     {:.precision$}", daily_volatility(series));
    println!("Max Drawdown:   {:.precision$}", max_drawdown(series));
    println!();
}
