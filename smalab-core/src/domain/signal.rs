//! Discrete trading signal and the signal-annotated bar.

use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// Per-bar trading signal.
///
/// The integer codes (0, 1, -1) are the wire values used by downstream
/// consumers of the signal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    #[default]
    Flat,
    EnterLong,
    ExitLong,
}

impl Signal {
    pub fn code(self) -> i8 {
        match self {
            Signal::Flat => 0,
            Signal::EnterLong => 1,
            Signal::ExitLong => -1,
        }
    }
}

/// A bar annotated with both moving averages and the resulting signal.
///
/// `sma_short` / `sma_long` are `None` until their rolling window is full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignaledBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub signal: Signal,
}

impl SignaledBar {
    /// Wrap a bar with no averages and a FLAT signal.
    pub fn flat(bar: Bar) -> Self {
        Self {
            bar,
            sma_short: None,
            sma_long: None,
            signal: Signal::Flat,
        }
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}
