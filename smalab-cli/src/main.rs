//! SMALab CLI — single runs and parameter sweeps.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML config file
//! - `sweep` — run a grid of (short, long) windows over the same data

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use smalab_runner::ledger::win_rate;
use smalab_runner::{
    best_by_return, load_data, run_single_backtest, run_sweep, save_artifacts, BacktestConfig,
    ParamGrid, RunReport,
};

#[derive(Parser)]
#[command(
    name = "smalab",
    about = "SMALab CLI — moving-average crossover backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// CSV bar file. Overrides `[data] path`.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Use this many synthetic bars instead of a file.
        #[arg(long, conflicts_with = "data")]
        synthetic: Option<usize>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Sweep short/long window pairs over one data set.
    Sweep {
        /// Path to a TOML config file (data source and risk settings).
        #[arg(long)]
        config: PathBuf,

        /// Short windows, comma-separated (e.g. 5,10,20).
        #[arg(long, value_delimiter = ',', default_values_t = [5, 10, 20])]
        short: Vec<usize>,

        /// Long windows, comma-separated (e.g. 50,100,200).
        #[arg(long, value_delimiter = ',', default_values_t = [50, 100, 200])]
        long: Vec<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            output_dir,
        } => run_cmd(config, data, synthetic, output_dir),
        Commands::Sweep {
            config,
            short,
            long,
        } => sweep_cmd(config, short, long),
    }
}

fn run_cmd(
    config_path: PathBuf,
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    output_dir: PathBuf,
) -> Result<()> {
    let mut config = BacktestConfig::from_file(&config_path)?;
    if let Some(path) = data {
        config.data.path = Some(path);
        config.data.synthetic_bars = None;
    } else if let Some(count) = synthetic {
        config.data.path = None;
        config.data.synthetic_bars = Some(count);
    }

    let report = run_single_backtest(&config)?;
    print_summary(&report);

    let run_dir = save_artifacts(&report, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn sweep_cmd(config_path: PathBuf, short: Vec<usize>, long: Vec<usize>) -> Result<()> {
    let config = BacktestConfig::from_file(&config_path)?;
    let grid = ParamGrid::new(short, long);
    if grid.size() == 0 {
        bail!("sweep grid is empty: every short window must be below some long window");
    }

    let data = load_data(&config)?;
    let reports = run_sweep(&grid, &config, &data)?;

    println!();
    println!(
        "{:>6} {:>6} {:>8} {:>10} {:>10} {:>8}",
        "Short", "Long", "Trades", "Return%", "MaxDD%", "Sharpe"
    );
    println!("{}", "-".repeat(53));
    for r in &reports {
        println!(
            "{:>6} {:>6} {:>8} {:>10.2} {:>10.2} {:>8.3}",
            r.short_window,
            r.long_window,
            r.result.trade_count,
            r.result.total_return_pct,
            r.result.max_drawdown_pct,
            r.result.sharpe_ratio
        );
    }

    if let Some(best) = best_by_return(&reports) {
        println!();
        println!(
            "Best: {} ({:.2}% return)",
            best.name, best.result.total_return_pct
        );
    }
    if data.is_synthetic() {
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();

    Ok(())
}

fn print_summary(report: &RunReport) {
    let result = &report.result;
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", report.name);
    println!("Symbol:         {}", report.symbol);
    if let (Some(start), Some(end)) = (report.start, report.end) {
        println!("Period:         {start} to {end}");
    }
    println!(
        "Bars:           {} ({} warmup)",
        report.bar_count,
        report.long_window.saturating_sub(1)
    );
    println!(
        "Signals:        {} entries, {} exits",
        report.signal_counts.enter_long, report.signal_counts.exit_long
    );
    println!(
        "Trades:         {} ({} buys, {} sells)",
        result.trade_count,
        result.buy_count(),
        result.sell_count()
    );
    println!();
    println!("--- Performance ---");
    println!("Initial:        {:.2}", result.initial_capital);
    println!("Final:          {:.2}", result.final_portfolio_value);
    println!("Total Return:   {:.2}%", result.total_return_pct);
    println!("Max Drawdown:   {:.2}%", result.max_drawdown_pct);
    println!("Sharpe:         {:.3}", result.sharpe_ratio);
    println!("Realized P&L:   {:.2}", result.realized_pnl());
    if result.sell_count() > 0 {
        println!("Win Rate:       {:.1}%", win_rate(&result.trades) * 100.0);
    }
    if result.ends_long() {
        println!("Open position marked to market at last close.");
    }
    if report.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
