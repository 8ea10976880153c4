//! Backtesting engine — single-symbol, single-position bar loop.
//!
//! The engine consumes a signaled series and replays it bar by bar:
//!
//! 1. While long: stop-loss, take-profit, then exit-signal checks
//! 2. While flat: enter on `EnterLong` if cash buys at least one share
//! 3. Every bar: record cash + shares * close
//!
//! Summary metrics are computed once the pass completes.

pub mod exits;
pub mod loop_runner;
pub mod state;

pub use exits::check_exit;
pub use loop_runner::{entry_size, run_backtest, step};
pub use state::{BacktestResult, EngineConfig, StepOutcome};
