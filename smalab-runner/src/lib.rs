//! SMALab Runner — backtest orchestration around `smalab-core`.
//!
//! This crate provides:
//! - TOML run configuration with validation and content-addressed run IDs
//! - CSV bar loading and deterministic synthetic data
//! - Single-backtest runner producing a `RunReport`
//! - Trade ledger with cumulative realized P&L
//! - JSON/CSV artifact export
//! - Parallel parameter sweeps over window pairs

pub mod config;
pub mod data_loader;
pub mod export;
pub mod ledger;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError, RunId};
pub use data_loader::{
    generate_synthetic_bars, load_bars_csv, load_synthetic, DataSource, LoadError, LoadedData,
};
pub use export::{export_json, import_json, save_artifacts};
pub use ledger::{build_ledger, LedgerEntry};
pub use runner::{
    load_data, run_backtest_from_data, run_single_backtest, RunError, RunReport, SCHEMA_VERSION,
};
pub use sweep::{best_by_return, run_sweep, ParamGrid};
