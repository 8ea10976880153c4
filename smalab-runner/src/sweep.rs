//! Parameter sweep over (short, long) window pairs.
//!
//! Each grid point is an independent backtest with its own position state,
//! run on the rayon pool. Results come back ordered by (short, long), so the
//! output does not depend on thread scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::BacktestConfig;
use crate::data_loader::LoadedData;
use crate::runner::{run_backtest_from_data, RunError, RunReport};

/// Window ranges to sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
}

impl ParamGrid {
    pub fn new(short_windows: Vec<usize>, long_windows: Vec<usize>) -> Self {
        Self {
            short_windows,
            long_windows,
        }
    }

    /// Short: 5, 10, 20. Long: 50, 100, 200.
    pub fn ma_crossover_default() -> Self {
        Self::new(vec![5, 10, 20], vec![50, 100, 200])
    }

    /// All valid (short, long) pairs, ascending. Pairs with short >= long or a
    /// zero window are skipped.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .short_windows
            .iter()
            .flat_map(|&s| self.long_windows.iter().map(move |&l| (s, l)))
            .filter(|&(s, l)| s >= 1 && s < l)
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    pub fn size(&self) -> usize {
        self.pairs().len()
    }
}

/// Run every grid point against the same data.
///
/// Fails on the first run error; otherwise returns one report per pair,
/// ordered by (short, long).
pub fn run_sweep(
    grid: &ParamGrid,
    base_config: &BacktestConfig,
    data: &LoadedData,
) -> Result<Vec<RunReport>, RunError> {
    let pairs = grid.pairs();
    info!(points = pairs.len(), bars = data.bars.len(), "starting sweep");

    let reports = pairs
        .par_iter()
        .map(|&(short, long)| run_backtest_from_data(&base_config.with_windows(short, long), data))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reports)
}

/// The report with the highest total return (ties: first in grid order).
pub fn best_by_return(reports: &[RunReport]) -> Option<&RunReport> {
    reports.iter().reduce(|best, r| {
        if r.result.total_return_pct > best.result.total_return_pct {
            r
        } else {
            best
        }
    })
}
