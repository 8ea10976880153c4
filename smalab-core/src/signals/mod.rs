//! Signal generation — portfolio-agnostic crossover signals.
//!
//! Signals never see portfolio state. They are a pure function of the bar
//! series and the two window lengths, so the same input always yields the
//! same signal column.

pub mod ma_cross;

pub use ma_cross::{classify_cross, MaCrossover};

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Signal, SignaledBar};

/// Derive the SMA crossover signal column for `series`.
///
/// Returns one `SignaledBar` per input bar, in input order. A series shorter
/// than `long_window` is all `Flat`.
pub fn generate_signals(
    series: &[Bar],
    short_window: usize,
    long_window: usize,
) -> Vec<SignaledBar> {
    MaCrossover::new(short_window, long_window).generate(series)
}

/// Per-signal tallies over a signaled series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub enter_long: usize,
    pub exit_long: usize,
    pub flat: usize,
}

impl SignalCounts {
    pub fn from_series(series: &[SignaledBar]) -> Self {
        series.iter().fold(Self::default(), |mut acc, sb| {
            match sb.signal {
                Signal::EnterLong => acc.enter_long += 1,
                Signal::ExitLong => acc.exit_long += 1,
                Signal::Flat => acc.flat += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.enter_long + self.exit_long + self.flat
    }
}
