//! Reporting and export — JSON and CSV artifact generation.
//!
//! Provides the persisted forms of a run:
//! - **JSON**: full round-trip serialization of `RunReport` with schema versioning
//! - **CSV**: trade ledger (with cumulative P&L) and portfolio-value series
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use smalab_core::domain::Trade;

use crate::ledger::build_ledger;
use crate::runner::{RunReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunReport` to pretty JSON.
pub fn export_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RunReport to JSON")
}

/// Deserialize a `RunReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunReport> {
    let report: RunReport =
        serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade ledger as CSV.
///
/// Columns: timestamp, bar_index, side, price, size, realized_pnl, reason,
/// cumulative_pnl
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "timestamp",
        "bar_index",
        "side",
        "price",
        "size",
        "realized_pnl",
        "reason",
        "cumulative_pnl",
    ])?;

    for e in build_ledger(trades) {
        wtr.write_record([
            &e.timestamp.to_string(),
            &e.bar_index.to_string(),
            e.side.as_str(),
            &format!("{:.6}", e.price),
            &e.size.to_string(),
            &format!("{:.2}", e.realized_pnl),
            e.reason.as_str(),
            &format!("{:.2}", e.cumulative_pnl),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the per-bar portfolio-value series with its timestamps.
pub fn export_portfolio_csv(report: &RunReport) -> Result<String> {
    let values = &report.result.portfolio_values;
    if values.len() != report.timestamps.len() {
        bail!(
            "portfolio series has {} values but {} timestamps",
            values.len(),
            report.timestamps.len()
        );
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "timestamp", "portfolio_value"])?;
    for (i, (ts, value)) in report.timestamps.iter().zip(values).enumerate() {
        wtr.write_record([&i.to_string(), &ts.to_string(), &format!("{:.2}", value)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single run.
///
/// Creates a directory named `{name}_{run_id prefix}/` directly under `output_dir`
/// containing:
/// - `report.json` — the full `RunReport`
/// - `trades.csv` — trade ledger with cumulative P&L
/// - `portfolio.csv` — bar-by-bar portfolio value
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
    let short_id: String = report.run_id.chars().take(12).collect();
    let dir_name = format!("{}_{}", artifact_dir_name(&report.name), short_id);
    let run_dir = output_dir.join(dir_name);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)
        .context("failed to write report.json")?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&report.result.trades)?)
        .context("failed to write trades.csv")?;
    std::fs::write(run_dir.join("portfolio.csv"), export_portfolio_csv(report)?)
        .context("failed to write portfolio.csv")?;

    Ok(run_dir)
}

/// Run name reduced to a single safe path component.
///
/// Separators and anything outside `[A-Za-z0-9._-]` become `_`; leading dots
/// are dropped so the name cannot climb out of the output directory.
fn artifact_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "run".to_string()
    } else {
        trimmed.to_string()
    }
}
