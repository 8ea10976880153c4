use serde::{Deserialize, Serialize};

/// Cash and single-slot position state, threaded through the engine one bar at a time.
///
/// `entry_price` is `Some` exactly while `shares_held > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub cash: f64,
    pub shares_held: u64,
    pub entry_price: Option<f64>,
}

impl PositionState {
    /// Flat state holding only cash.
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            shares_held: 0,
            entry_price: None,
        }
    }

    pub fn is_long(&self) -> bool {
        self.shares_held > 0
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held == 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares_held as f64 * price
    }

    /// Cash plus the position marked at `price`.
    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    /// Fractional return of `price` against the entry price, `None` when flat.
    pub fn return_since_entry(&self, price: f64) -> Option<f64> {
        match self.entry_price {
            Some(entry) if self.is_long() => Some((price - entry) / entry),
            _ => None,
        }
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.entry_price {
            Some(entry) => self.shares_held as f64 * (price - entry),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_flat() {
        let state = PositionState::new(10_000.0);
        assert!(state.is_flat());
        assert_eq!(state.entry_price, None);
        assert_eq!(state.portfolio_value(123.0), 10_000.0);
        assert_eq!(state.return_since_entry(123.0), None);
    }

    #[test]
    fn long_state_marks_to_market() {
        let state = PositionState {
            cash: 50.0,
            shares_held: 199,
            entry_price: Some(50.0),
        };
        assert_eq!(state.portfolio_value(51.0), 50.0 + 199.0 * 51.0);
        assert_eq!(state.unrealized_pnl(49.0), -199.0);
        let r = state.return_since_entry(49.4).unwrap();
        assert!((r + 0.012).abs() < 1e-12);
    }
}
