//! Moving average crossover signal — golden cross and death cross detection.
//!
//! Emits `EnterLong` when the short SMA crosses above the long SMA and
//! `ExitLong` when it crosses below. Every other bar is `Flat`.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Signal, SignaledBar};
use crate::indicators::Sma;

/// SMA crossover signal generator.
///
/// `short_window < long_window` is the intended configuration but is not
/// enforced here; an inverted pair simply produces inverted crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }

    /// Annotate every bar with both averages and its crossover signal.
    ///
    /// Output has the same length and order as `bars`.
    pub fn generate(&self, bars: &[Bar]) -> Vec<SignaledBar> {
        let short = Sma::new(self.short_window).compute(bars);
        let long = Sma::new(self.long_window).compute(bars);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let signal = match i.checked_sub(1) {
                    Some(p) => classify_cross((short[p], long[p]), (short[i], long[i])),
                    None => Signal::Flat,
                };
                SignaledBar {
                    bar: bar.clone(),
                    sma_short: short[i],
                    sma_long: long[i],
                    signal,
                }
            })
            .collect()
    }
}

/// Classify the transition between two consecutive (short, long) pairs.
///
/// Any undefined average on either bar yields `Flat`.
pub fn classify_cross(
    prev: (Option<f64>, Option<f64>),
    cur: (Option<f64>, Option<f64>),
) -> Signal {
    let (Some(short_prev), Some(long_prev), Some(short_cur), Some(long_cur)) =
        (prev.0, prev.1, cur.0, cur.1)
    else {
        return Signal::Flat;
    };

    // Golden cross: previous bar short <= long, current bar short > long.
    if short_cur > long_cur && short_prev <= long_prev {
        return Signal::EnterLong;
    }

    // Death cross: previous bar short >= long, current bar short < long.
    if short_cur < long_cur && short_prev >= long_prev {
        return Signal::ExitLong;
    }

    Signal::Flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn golden_cross_fires_enter() {
        let s = classify_cross((Some(95.0), Some(100.0)), (Some(105.0), Some(100.0)));
        assert_eq!(s, Signal::EnterLong);
    }

    #[test]
    fn touch_then_cross_fires_enter() {
        // Previous bar equal counts as "at or below".
        let s = classify_cross((Some(100.0), Some(100.0)), (Some(100.5), Some(100.0)));
        assert_eq!(s, Signal::EnterLong);
    }

    #[test]
    fn death_cross_fires_exit() {
        let s = classify_cross((Some(105.0), Some(100.0)), (Some(95.0), Some(100.0)));
        assert_eq!(s, Signal::ExitLong);
    }

    #[test]
    fn no_fire_when_trend_continues() {
        let s = classify_cross((Some(105.0), Some(100.0)), (Some(106.0), Some(100.0)));
        assert_eq!(s, Signal::Flat);
    }

    #[test]
    fn equal_averages_are_flat() {
        let s = classify_cross((Some(100.0), Some(100.0)), (Some(100.0), Some(100.0)));
        assert_eq!(s, Signal::Flat);
    }

    #[test]
    fn undefined_previous_is_flat() {
        let s = classify_cross((Some(95.0), None), (Some(105.0), Some(100.0)));
        assert_eq!(s, Signal::Flat);
    }

    #[test]
    fn generate_preserves_length_and_order() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let out = MaCrossover::new(3, 5).generate(&bars);
        assert_eq!(out.len(), bars.len());
        for (sb, bar) in out.iter().zip(&bars) {
            assert_eq!(&sb.bar, bar);
        }
    }

    #[test]
    fn averages_undefined_during_warmup() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let out = MaCrossover::new(2, 4).generate(&bars);
        assert!(out[0].sma_short.is_none());
        assert_eq!(out[1].sma_short, Some(1.5));
        assert!(out[2].sma_long.is_none());
        assert_eq!(out[3].sma_long, Some(2.5));
        // Rising series: short stays above long once both exist, never crosses.
        assert!(out.iter().all(|sb| sb.signal == Signal::Flat));
    }

    #[test]
    fn averages_match_standalone_sma() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let bars = make_bars(&closes);
        let out = MaCrossover::new(4, 12).generate(&bars);
        let short = Sma::new(4).compute(&bars);
        let long = Sma::new(12).compute(&bars);
        for (i, sb) in out.iter().enumerate() {
            assert_eq!(sb.sma_short, short[i]);
            assert_eq!(sb.sma_long, long[i]);
        }
    }
}
