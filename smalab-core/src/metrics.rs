//! Performance metrics — pure functions over the portfolio-value series.
//!
//! Every metric is computed once, after the bar loop finishes. Percentages
//! are expressed in percent units (12.5 = 12.5%), ratios are unitless.

/// Trading periods per year used to annualize the Sharpe ratio.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Total return in percent: (final - initial) / initial * 100.
pub fn total_return_pct(initial_capital: f64, final_value: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_value - initial_capital) / initial_capital * 100.0
}

/// Per-bar simple returns, one per input value.
///
/// The first return is 0.0, as is any return whose previous value is not
/// positive.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(values.len());
    if values.is_empty() {
        return returns;
    }
    returns.push(0.0);
    returns.extend(values.windows(2).map(|w| {
        if w[0] > 0.0 {
            w[1] / w[0] - 1.0
        } else {
            0.0
        }
    }));
    returns
}

/// Annualized Sharpe ratio of per-bar returns (zero risk-free rate).
///
/// Sharpe = mean(r) / sample_std(r) * sqrt(252).
/// Returns 0.0 if the deviation is undefined or below 1e-15, so a flat series
/// carrying only rounding noise scores 0.0.
pub fn sharpe_ratio(values: &[f64]) -> f64 {
    let returns = period_returns(values);
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(&returns);
    if !std.is_finite() || std < 1e-15 {
        return 0.0;
    }
    mean_f64(&returns) / std * PERIODS_PER_YEAR.sqrt()
}

/// Maximum drawdown in percent as a non-positive number (e.g., -15.0).
///
/// Returns 0.0 if the series never falls below its running peak.
pub fn max_drawdown_pct(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &v in values {
        if v > peak {
            peak = v;
        }
        if peak > 0.0 {
            let dd = (v - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd * 100.0
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_return_basic() {
        assert!((total_return_pct(10_000.0, 11_000.0) - 10.0).abs() < 1e-12);
        assert_eq!(total_return_pct(10_000.0, 10_000.0), 0.0);
        assert!((total_return_pct(10_000.0, 9_000.0) + 10.0).abs() < 1e-12);
    }

    #[test]
    fn period_returns_start_at_zero() {
        let r = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], 0.0);
        assert!((r[1] - 0.1).abs() < 1e-12);
        assert!((r[2] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn period_returns_empty() {
        assert!(period_returns(&[]).is_empty());
    }

    #[test]
    fn sharpe_constant_is_zero() {
        assert_eq!(sharpe_ratio(&[100.0; 30]), 0.0);
    }

    #[test]
    fn sharpe_rounding_noise_is_zero() {
        let noisy = [1.0, 1.0 + f64::EPSILON, 1.0 + f64::EPSILON];
        assert!(std_dev(&period_returns(&noisy)) > 0.0);
        assert_eq!(sharpe_ratio(&noisy), 0.0);
    }

    #[test]
    fn sharpe_single_value_is_zero() {
        assert_eq!(sharpe_ratio(&[100.0]), 0.0);
    }

    #[test]
    fn sharpe_matches_hand_computation() {
        let values = [100.0, 110.0, 99.0];
        // returns: 0, 0.1, -0.1 → mean 0 → Sharpe 0
        assert!(sharpe_ratio(&values).abs() < 1e-12);

        let values = [100.0, 101.0, 103.02];
        // returns: 0, 0.01, 0.02; mean 0.01, sample std 0.01
        let expected = 0.01 / 0.01 * 252.0_f64.sqrt();
        assert!((sharpe_ratio(&values) - expected).abs() < 1e-9);
    }

    #[test]
    fn sharpe_rising_series_is_positive() {
        let values: Vec<f64> = (0..50).map(|i| 100.0 * 1.01_f64.powi(i) + (i % 3) as f64).collect();
        assert!(sharpe_ratio(&values) > 0.0);
    }

    #[test]
    fn max_drawdown_basic() {
        let values = [100.0, 120.0, 90.0, 130.0, 117.0];
        // worst: 90 vs peak 120 → -25%
        assert!((max_drawdown_pct(&values) + 25.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_monotonic_is_zero() {
        assert_eq!(max_drawdown_pct(&[100.0, 101.0, 102.0]), 0.0);
        assert_eq!(max_drawdown_pct(&[100.0; 5]), 0.0);
        assert_eq!(max_drawdown_pct(&[]), 0.0);
    }

    #[test]
    fn std_dev_uses_bessel() {
        // mean 2, squared deviations sum 2, n-1 = 2 → var 1
        assert!((std_dev(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert_eq!(std_dev(&[5.0]), 0.0);
    }
}
