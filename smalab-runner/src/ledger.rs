//! Trade ledger with running realized P&L.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smalab_core::domain::{Trade, TradeReason, TradeSide};

/// One ledger row: the trade plus cumulative realized P&L through this row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: NaiveDateTime,
    pub bar_index: usize,
    pub side: TradeSide,
    pub price: f64,
    pub size: u64,
    pub realized_pnl: f64,
    pub reason: TradeReason,
    pub cumulative_pnl: f64,
}

pub fn build_ledger(trades: &[Trade]) -> Vec<LedgerEntry> {
    let mut cumulative = 0.0;
    trades
        .iter()
        .map(|t| {
            cumulative += t.realized_pnl;
            LedgerEntry {
                timestamp: t.timestamp,
                bar_index: t.bar_index,
                side: t.side,
                price: t.price,
                size: t.size,
                realized_pnl: t.realized_pnl,
                reason: t.reason,
                cumulative_pnl: cumulative,
            }
        })
        .collect()
}

/// Fraction of closed round trips with positive realized P&L.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let sells: Vec<&Trade> = trades.iter().filter(|t| t.is_sell()).collect();
    if sells.is_empty() {
        return 0.0;
    }
    sells.iter().filter(|t| t.is_winner()).count() as f64 / sells.len() as f64
}
