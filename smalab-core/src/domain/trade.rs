//! Trade — one position transition (entry or exit) in the ledger.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// What caused a position transition.
///
/// Buys are always `EntrySignal`. Sells carry whichever exit rule fired first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeReason {
    EntrySignal,
    StopLoss,
    TakeProfit,
    ExitSignal,
}

impl TradeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeReason::EntrySignal => "ENTRY_SIGNAL",
            TradeReason::StopLoss => "STOP_LOSS",
            TradeReason::TakeProfit => "TAKE_PROFIT",
            TradeReason::ExitSignal => "EXIT_SIGNAL",
        }
    }
}

/// Ledger record emitted at each position transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: NaiveDateTime,
    /// Index of the bar this trade executed on.
    pub bar_index: usize,
    pub side: TradeSide,
    pub price: f64,
    pub size: u64,
    /// Zero for buys; `(exit - entry) * size` for sells.
    pub realized_pnl: f64,
    pub reason: TradeReason,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }

    /// Cash moved by this trade: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        let notional = self.size as f64 * self.price;
        match self.side {
            TradeSide::Buy => -notional,
            TradeSide::Sell => notional,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.is_sell() && self.realized_pnl > 0.0
    }
}
