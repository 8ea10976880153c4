//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use std::collections::VecDeque;

use crate::domain::Bar;

/// Sliding-window arithmetic mean with O(1) amortized updates.
///
/// Non-finite values are tracked by count instead of being summed, so a NaN
/// leaving the window restores a valid mean without rescanning.
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    non_finite: usize,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            non_finite: 0,
        }
    }

    /// Push a value and return the mean of the trailing `period` values,
    /// or `None` while the window is not full or contains a non-finite value.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }

        if self.window.len() == self.period {
            if let Some(leaving) = self.window.pop_front() {
                if leaving.is_finite() {
                    self.sum -= leaving;
                } else {
                    self.non_finite -= 1;
                }
            }
        }

        if value.is_finite() {
            self.sum += value;
        } else {
            self.non_finite += 1;
        }
        self.window.push_back(value);

        if self.window.len() < self.period || self.non_finite > 0 {
            return None;
        }
        Some(self.sum / self.period as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// A zero period is accepted and yields an all-`None` series.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Compute the SMA of close prices, one value per bar.
    pub fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut rolling = RollingMean::new(self.period);
        bars.iter().map(|bar| rolling.push(bar.close)).collect()
    }
}
