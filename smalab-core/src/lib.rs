//! SMALab Core — domain types, crossover signals, simulation engine, metrics.
//!
//! This crate contains the algorithmic heart of the backtester:
//! - Domain types (bars, signaled bars, position state, trades)
//! - O(1) rolling SMA
//! - SMA crossover signal generator
//! - Bar-by-bar single-position engine with stop-loss / take-profit exits
//! - Performance metrics (total return, max drawdown, Sharpe)
//!
//! Everything here is pure: no I/O, no process-wide state.

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod signals;

pub use domain::{Bar, PositionState, Signal, SignaledBar, Trade, TradeReason, TradeSide};
pub use engine::{run_backtest, BacktestResult, EngineConfig};
pub use error::EngineError;
pub use signals::{generate_signals, SignalCounts};
