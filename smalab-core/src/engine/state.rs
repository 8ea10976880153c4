//! Engine configuration, per-bar step outcome, and run result types.

use serde::{Deserialize, Serialize};

use crate::domain::{PositionState, Trade};
use crate::error::EngineError;

/// Parameters for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Fractional loss from entry that forces an exit (0.01 = 1%).
    pub stop_loss_pct: f64,
    /// Fractional gain from entry that forces an exit (0.5 = 50%).
    pub take_profit_pct: f64,
}

impl EngineConfig {
    pub fn new(initial_capital: f64, stop_loss_pct: f64, take_profit_pct: f64) -> Self {
        Self {
            initial_capital,
            stop_loss_pct,
            take_profit_pct,
        }
    }

    /// Reject non-positive (or NaN) capital and risk thresholds.
    pub fn validate(&self) -> Result<(), EngineError> {
        let checks = [
            ("initial_capital", self.initial_capital),
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
        ];
        for (field, value) in checks {
            if !(value > 0.0) {
                return Err(EngineError::InvalidConfiguration(format!(
                    "{field} must be > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(10_000.0, 0.01, 0.5)
    }
}

/// State after processing one bar, plus the trade it emitted (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: PositionState,
    pub trade: Option<Trade>,
}

impl StepOutcome {
    pub fn hold(state: PositionState) -> Self {
        Self { state, trade: None }
    }
}

/// Summary statistics, trade ledger, and portfolio-value series of one run.
///
/// Built once after the bar loop completes and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_portfolio_value: f64,
    pub total_return_pct: f64,
    /// Non-positive percentage (e.g., -12.5 = 12.5% peak-to-trough).
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub trade_count: usize,
    pub trades: Vec<Trade>,
    /// One value per input bar: cash + shares_held * close.
    pub portfolio_values: Vec<f64>,
}

impl BacktestResult {
    pub fn buy_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_buy()).count()
    }

    pub fn sell_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_sell()).count()
    }

    /// True when the run ended holding shares (an unmatched BUY).
    pub fn ends_long(&self) -> bool {
        self.buy_count() > self.sell_count()
    }

    /// Sum of realized P&L over all exits.
    pub fn realized_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.realized_pnl).sum()
    }
}
