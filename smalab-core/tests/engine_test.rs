//! Integration tests for the simulation engine.
//!
//! Tests:
//! 1. Constant-price run: no crossovers, all metrics zero
//! 2. Stop-loss exit on the bar after entry
//! 3. Take-profit precedence over a same-bar exit signal
//! 4. Same-bar re-entry suppression after a risk exit
//! 5. Portfolio accounting identity at every bar

use chrono::{NaiveDate, NaiveDateTime};
use smalab_core::domain::{Bar, PositionState, Signal, SignaledBar, TradeReason, TradeSide};
use smalab_core::engine::{run_backtest, step, EngineConfig};
use smalab_core::signals::generate_signals;

fn base_ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: base_ts() + chrono::Duration::days(i as i64),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// Bars with hand-placed signals, bypassing the generator.
fn with_signals(closes: &[f64], signals: &[(usize, Signal)]) -> Vec<SignaledBar> {
    let mut series: Vec<SignaledBar> = bars_from_closes(closes)
        .into_iter()
        .map(SignaledBar::flat)
        .collect();
    for &(i, s) in signals {
        series[i].signal = s;
    }
    series
}

#[test]
fn constant_price_produces_no_trades_and_zero_metrics() {
    let series = generate_signals(&bars_from_closes(&[100.0; 60]), 10, 20);
    assert!(series.iter().all(|sb| sb.signal == Signal::Flat));

    let result = run_backtest(&series, &EngineConfig::new(10_000.0, 0.01, 0.5)).unwrap();
    assert_eq!(result.trade_count, 0);
    assert_eq!(result.total_return_pct, 0.0);
    assert_eq!(result.max_drawdown_pct, 0.0);
    assert_eq!(result.sharpe_ratio, 0.0);
    assert_eq!(result.final_portfolio_value, 10_000.0);
    assert_eq!(result.portfolio_values.len(), 60);
}

#[test]
fn stop_loss_fires_on_next_bar() {
    let mut closes = vec![50.0; 22];
    closes[21] = 49.4;
    let series = with_signals(&closes, &[(20, Signal::EnterLong)]);

    let result = run_backtest(&series, &EngineConfig::new(10_000.0, 0.01, 0.5)).unwrap();
    assert_eq!(result.trade_count, 2);

    let buy = &result.trades[0];
    assert_eq!(buy.side, TradeSide::Buy);
    assert_eq!(buy.bar_index, 20);
    assert_eq!(buy.price, 50.0);
    assert_eq!(buy.size, 200);

    let sell = &result.trades[1];
    assert_eq!(sell.side, TradeSide::Sell);
    assert_eq!(sell.reason, TradeReason::StopLoss);
    assert_eq!(sell.bar_index, 21);
    assert_eq!(sell.price, 49.4);
    assert!(sell.realized_pnl < 0.0);
    assert!((sell.realized_pnl - (49.4 - 50.0) * 200.0).abs() < 1e-9);

    // Back to flat: final value is cash only.
    assert!(!result.ends_long());
    assert!((result.final_portfolio_value - 200.0 * 49.4).abs() < 1e-9);
    assert!(result.max_drawdown_pct < 0.0);
}

#[test]
fn take_profit_wins_over_same_bar_exit_signal() {
    let series = with_signals(
        &[40.0, 41.0, 61.0, 62.0],
        &[(0, Signal::EnterLong), (2, Signal::ExitLong)],
    );

    let result = run_backtest(&series, &EngineConfig::new(10_000.0, 0.01, 0.5)).unwrap();
    let sells: Vec<_> = result.trades.iter().filter(|t| t.is_sell()).collect();
    assert_eq!(sells.len(), 1, "exactly one exit, no double-exit");
    assert_eq!(sells[0].reason, TradeReason::TakeProfit);
    assert_eq!(sells[0].bar_index, 2);
    assert_eq!(result.trade_count, 2);
}

#[test]
fn risk_exit_suppresses_same_bar_entry() {
    // Bar 1 hits stop-loss while also carrying an entry signal.
    let series = with_signals(
        &[50.0, 40.0, 40.0],
        &[(0, Signal::EnterLong), (1, Signal::EnterLong)],
    );

    let result = run_backtest(&series, &EngineConfig::default()).unwrap();
    assert_eq!(result.trade_count, 2);
    assert_eq!(result.trades[1].reason, TradeReason::StopLoss);
    assert!(!result.ends_long());
}

#[test]
fn reentry_allowed_on_later_bar() {
    let series = with_signals(
        &[50.0, 40.0, 40.0, 44.0],
        &[(0, Signal::EnterLong), (2, Signal::EnterLong)],
    );

    let result = run_backtest(&series, &EngineConfig::default()).unwrap();
    assert_eq!(result.trade_count, 3);
    let buy = &result.trades[2];
    assert_eq!(buy.side, TradeSide::Buy);
    assert_eq!(buy.bar_index, 2);
    // Cash after the stop: 200 * 40 = 8000 → 200 shares at 40.
    assert_eq!(buy.size, 200);
    assert!(result.ends_long());
    assert!((result.final_portfolio_value - 200.0 * 44.0).abs() < 1e-9);
    assert!((result.total_return_pct + 12.0).abs() < 1e-9);
}

#[test]
fn insufficient_capital_is_not_an_error() {
    let series = with_signals(&[500.0, 510.0], &[(0, Signal::EnterLong)]);
    let result = run_backtest(&series, &EngineConfig::new(100.0, 0.01, 0.5)).unwrap();
    assert_eq!(result.trade_count, 0);
    assert_eq!(result.portfolio_values, vec![100.0, 100.0]);
}

#[test]
fn portfolio_identity_holds_every_bar() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + 10.0 * (i as f64 * 0.15).sin())
        .collect();
    let series = generate_signals(&bars_from_closes(&closes), 5, 15);
    let config = EngineConfig::new(25_000.0, 0.05, 0.2);
    let result = run_backtest(&series, &config).unwrap();

    // Replay with the public step function and compare.
    let mut state = PositionState::new(config.initial_capital);
    for (i, sb) in series.iter().enumerate() {
        state = step(state, sb, i, &config).state;
        assert_eq!(
            result.portfolio_values[i],
            state.cash + state.shares_held as f64 * sb.bar.close
        );
    }
    assert!(result.trade_count > 0, "sine series should cross at least once");
}

#[test]
fn trade_timestamps_stay_within_series() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 50.0 + 8.0 * (i as f64 * 0.07).sin() + i as f64 * 0.02)
        .collect();
    let series = generate_signals(&bars_from_closes(&closes), 10, 30);
    let result = run_backtest(&series, &EngineConfig::new(10_000.0, 0.03, 0.1)).unwrap();

    let first = series.first().unwrap().bar.timestamp;
    let last = series.last().unwrap().bar.timestamp;
    for pair in result.trades.windows(2) {
        assert!(pair[0].bar_index < pair[1].bar_index);
    }
    for t in &result.trades {
        assert!(t.timestamp >= first && t.timestamp <= last);
        assert_eq!(t.timestamp, series[t.bar_index].bar.timestamp);
    }
}
