//! Exit rules for an open long position.
//!
//! Priority per bar: stop-loss, then take-profit, then the EXIT_LONG signal.
//! The first rule that fires wins; the rest are not consulted.

use crate::domain::{PositionState, Signal, TradeReason};
use crate::engine::EngineConfig;

/// Return the exit reason for the open position in `state`, evaluated at `price`.
///
/// A flat state never exits.
pub fn check_exit(
    state: &PositionState,
    price: f64,
    signal: Signal,
    config: &EngineConfig,
) -> Option<TradeReason> {
    let current_return = state.return_since_entry(price)?;

    if current_return <= -config.stop_loss_pct {
        return Some(TradeReason::StopLoss);
    }
    if current_return >= config.take_profit_pct {
        return Some(TradeReason::TakeProfit);
    }
    if signal == Signal::ExitLong {
        return Some(TradeReason::ExitSignal);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::new(10_000.0, 0.01, 0.5)
    }

    fn long_at(entry: f64) -> PositionState {
        PositionState {
            cash: 0.0,
            shares_held: 100,
            entry_price: Some(entry),
        }
    }

    #[test]
    fn stop_loss_fires_at_threshold() {
        assert_eq!(
            check_exit(&long_at(50.0), 49.4, Signal::Flat, &cfg()),
            Some(TradeReason::StopLoss)
        );
        assert_eq!(
            check_exit(&long_at(100.0), 99.0, Signal::Flat, &cfg()),
            Some(TradeReason::StopLoss)
        );
    }

    #[test]
    fn small_loss_holds() {
        assert_eq!(check_exit(&long_at(100.0), 99.5, Signal::Flat, &cfg()), None);
    }

    #[test]
    fn take_profit_fires() {
        assert_eq!(
            check_exit(&long_at(100.0), 150.0, Signal::Flat, &cfg()),
            Some(TradeReason::TakeProfit)
        );
    }

    #[test]
    fn take_profit_beats_exit_signal() {
        assert_eq!(
            check_exit(&long_at(100.0), 160.0, Signal::ExitLong, &cfg()),
            Some(TradeReason::TakeProfit)
        );
    }

    #[test]
    fn stop_loss_beats_exit_signal() {
        assert_eq!(
            check_exit(&long_at(100.0), 90.0, Signal::ExitLong, &cfg()),
            Some(TradeReason::StopLoss)
        );
    }

    #[test]
    fn exit_signal_inside_band() {
        assert_eq!(
            check_exit(&long_at(100.0), 101.0, Signal::ExitLong, &cfg()),
            Some(TradeReason::ExitSignal)
        );
        assert_eq!(check_exit(&long_at(100.0), 101.0, Signal::EnterLong, &cfg()), None);
    }

    #[test]
    fn flat_state_never_exits() {
        let flat = PositionState::new(10_000.0);
        assert_eq!(check_exit(&flat, 1.0, Signal::ExitLong, &cfg()), None);
    }
}
