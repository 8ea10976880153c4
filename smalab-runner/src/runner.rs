//! Backtest runner — wires together data loading, signals, engine, and metrics.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads data per the config, then runs. Used by CLI.
//! - `run_backtest_from_data()`: takes pre-loaded data, no I/O. Used by sweeps.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use smalab_core::engine::{run_backtest, BacktestResult};
use smalab_core::error::EngineError;
use smalab_core::signals::{generate_signals, SignalCounts};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_bars_csv, load_synthetic, LoadError, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("no data source configured (set [data] path or synthetic_bars)")]
    NoDataSource,
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete record of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub name: String,
    pub symbol: String,
    pub short_window: usize,
    pub long_window: usize,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub bar_count: usize,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub signal_counts: SignalCounts,
    pub result: BacktestResult,
    /// Bar timestamps, aligned with `result.portfolio_values`.
    pub timestamps: Vec<NaiveDateTime>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Load the bars a config points at: CSV path first, then synthetic.
pub fn load_data(config: &BacktestConfig) -> Result<LoadedData, RunError> {
    if let Some(path) = &config.data.path {
        return Ok(load_bars_csv(path)?);
    }
    if let Some(count) = config.data.synthetic_bars {
        warn!(count, seed = config.data.seed, "using synthetic bars");
        return Ok(load_synthetic(count, config.data.seed));
    }
    Err(RunError::NoDataSource)
}

/// Run a single backtest from a config, loading its data source.
///
/// The config is validated before any data is read.
pub fn run_single_backtest(config: &BacktestConfig) -> Result<RunReport, RunError> {
    config.validate()?;
    let data = load_data(config)?;
    run_validated(config, &data)
}

/// Run a backtest with pre-loaded data — no I/O.
pub fn run_backtest_from_data(
    config: &BacktestConfig,
    data: &LoadedData,
) -> Result<RunReport, RunError> {
    config.validate()?;
    run_validated(config, data)
}

fn run_validated(config: &BacktestConfig, data: &LoadedData) -> Result<RunReport, RunError> {
    let name = config.display_name();
    let short_window = config.signal.short_window;
    let long_window = config.signal.long_window;

    info!(
        run = %name,
        bars = data.bars.len(),
        short_window,
        long_window,
        "starting backtest"
    );

    let series = generate_signals(&data.bars, short_window, long_window);
    let signal_counts = SignalCounts::from_series(&series);
    let result = run_backtest(&series, &config.engine_config())?;

    info!(
        run = %name,
        trades = result.trade_count,
        total_return_pct = result.total_return_pct,
        max_drawdown_pct = result.max_drawdown_pct,
        sharpe = result.sharpe_ratio,
        "backtest finished"
    );

    Ok(RunReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        name,
        symbol: config.backtest.symbol.clone(),
        short_window,
        long_window,
        stop_loss_pct: config.risk.stop_loss_pct,
        take_profit_pct: config.risk.take_profit_pct,
        start: data.bars.first().map(|b| b.timestamp),
        end: data.bars.last().map(|b| b.timestamp),
        bar_count: data.bars.len(),
        dataset_hash: data.dataset_hash.clone(),
        has_synthetic: data.is_synthetic(),
        signal_counts,
        result,
        timestamps: data.bars.iter().map(|b| b.timestamp).collect(),
    })
}
