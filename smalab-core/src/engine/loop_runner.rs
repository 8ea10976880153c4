//! Bar-by-bar simulation loop.
//!
//! The loop is an index-driven fold: a `PositionState` value goes into
//! [`step`] with one bar and comes back out with at most one trade. Each run
//! owns its state, ledger, and portfolio series; nothing outlives the call.

use tracing::debug;

use crate::domain::{PositionState, Signal, SignaledBar, Trade, TradeReason, TradeSide};
use crate::engine::exits::check_exit;
use crate::engine::state::{BacktestResult, EngineConfig, StepOutcome};
use crate::error::EngineError;
use crate::metrics;

/// Run the single-position simulation over a signaled series.
///
/// Fails before simulating anything if the config is invalid or the series is
/// empty. An open position at the end is marked to market, not closed.
pub fn run_backtest(
    series: &[SignaledBar],
    config: &EngineConfig,
) -> Result<BacktestResult, EngineError> {
    config.validate()?;
    let last = series.last().ok_or(EngineError::EmptySeries)?;

    let mut state = PositionState::new(config.initial_capital);
    let mut trades: Vec<Trade> = Vec::new();
    let mut portfolio_values: Vec<f64> = Vec::with_capacity(series.len());

    for index in 0..series.len() {
        let bar = &series[index];
        let outcome = step(state, bar, index, config);
        state = outcome.state;
        if let Some(trade) = outcome.trade {
            trades.push(trade);
        }
        portfolio_values.push(state.portfolio_value(bar.close()));
    }

    let final_portfolio_value = state.portfolio_value(last.close());

    debug!(
        bars = series.len(),
        trades = trades.len(),
        final_portfolio_value,
        "backtest complete"
    );

    Ok(BacktestResult {
        initial_capital: config.initial_capital,
        final_portfolio_value,
        total_return_pct: metrics::total_return_pct(config.initial_capital, final_portfolio_value),
        max_drawdown_pct: metrics::max_drawdown_pct(&portfolio_values),
        sharpe_ratio: metrics::sharpe_ratio(&portfolio_values),
        trade_count: trades.len(),
        trades,
        portfolio_values,
    })
}

/// Advance the position state by one bar.
///
/// While long, risk exits are checked first and an exit consumes the bar. While
/// flat, an `EnterLong` signal buys as many whole shares as cash allows.
pub fn step(
    state: PositionState,
    bar: &SignaledBar,
    index: usize,
    config: &EngineConfig,
) -> StepOutcome {
    if state.is_flat() {
        return match bar.signal {
            Signal::EnterLong => open_position(state, bar, index),
            _ => StepOutcome::hold(state),
        };
    }

    match check_exit(&state, bar.close(), bar.signal, config) {
        Some(reason) => close_position(state, bar, index, reason),
        None => StepOutcome::hold(state),
    }
}

/// Whole shares purchasable with `cash` at `price`; zero for unusable prices.
pub fn entry_size(cash: f64, price: f64) -> u64 {
    if !(price > 0.0) || !price.is_finite() || !(cash > 0.0) {
        return 0;
    }
    (cash / price).floor() as u64
}

fn open_position(state: PositionState, bar: &SignaledBar, index: usize) -> StepOutcome {
    let price = bar.close();
    let size = entry_size(state.cash, price);
    if size == 0 {
        debug!(
            bar = index,
            price,
            cash = state.cash,
            "entry skipped: insufficient capital"
        );
        return StepOutcome::hold(state);
    }

    let trade = Trade {
        timestamp: bar.bar.timestamp,
        bar_index: index,
        side: TradeSide::Buy,
        price,
        size,
        realized_pnl: 0.0,
        reason: TradeReason::EntrySignal,
    };
    let next = PositionState {
        cash: state.cash + trade.cash_flow(),
        shares_held: size,
        entry_price: Some(price),
    };
    debug!(bar = index, price, size, "opened long");

    StepOutcome {
        state: next,
        trade: Some(trade),
    }
}

fn close_position(
    state: PositionState,
    bar: &SignaledBar,
    index: usize,
    reason: TradeReason,
) -> StepOutcome {
    let price = bar.close();
    let size = state.shares_held;
    let trade = Trade {
        timestamp: bar.bar.timestamp,
        bar_index: index,
        side: TradeSide::Sell,
        price,
        size,
        realized_pnl: state.unrealized_pnl(price),
        reason,
    };
    let next = PositionState {
        cash: state.cash + trade.cash_flow(),
        shares_held: 0,
        entry_price: None,
    };
    debug!(
        bar = index,
        price,
        size,
        realized_pnl = trade.realized_pnl,
        reason = reason.as_str(),
        "closed long"
    );

    StepOutcome {
        state: next,
        trade: Some(trade),
    }
}
