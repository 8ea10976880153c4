//! Data loading — CSV bar files and deterministic synthetic bars.
//!
//! Bars come from one of two sources:
//! 1. A header CSV with timestamp/open/high/low/close/volume columns
//! 2. A seeded random walk, for development and tests
//!
//! Loaded series are checked to be strictly ascending by timestamp, and every
//! bar must pass `Bar::is_sane`.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use smalab_core::domain::Bar;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unrecognized timestamp '{value}'")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: timestamp {timestamp} is earlier than the previous row")]
    Unsorted { row: usize, timestamp: NaiveDateTime },

    #[error("row {row}: duplicate timestamp {timestamp}")]
    Duplicate { row: usize, timestamp: NaiveDateTime },

    #[error("row {row}: bar fails OHLC sanity check")]
    InvalidBar { row: usize },
}

/// Where a loaded series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Csv { path: PathBuf },
    Synthetic { seed: u64 },
}

/// Bars plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<Bar>,
    pub source: DataSource,
    /// BLAKE3 over every bar, for reproducibility checks.
    pub dataset_hash: String,
}

impl LoadedData {
    pub fn new(bars: Vec<Bar>, source: DataSource) -> Self {
        let dataset_hash = compute_dataset_hash(&bars);
        Self {
            bars,
            source,
            dataset_hash,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.source, DataSource::Synthetic { .. })
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(
        alias = "Timestamp",
        alias = "Date",
        alias = "date",
        alias = "Datetime",
        alias = "datetime"
    )]
    timestamp: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Load bars from a CSV file on disk.
pub fn load_bars_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_bars_csv(file)?;
    Ok(LoadedData::new(
        bars,
        DataSource::Csv {
            path: path.to_path_buf(),
        },
    ))
}

/// Parse bars from any CSV reader. Extra columns (e.g. `Adj Close`) are ignored.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars: Vec<Bar> = Vec::new();

    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row_num = i + 1;
        let row = record?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| LoadError::Timestamp {
            row: row_num,
            value: row.timestamp.clone(),
        })?;

        if let Some(prev) = bars.last() {
            if timestamp == prev.timestamp {
                return Err(LoadError::Duplicate {
                    row: row_num,
                    timestamp,
                });
            }
            if timestamp < prev.timestamp {
                return Err(LoadError::Unsorted {
                    row: row_num,
                    timestamp,
                });
            }
        }

        let bar = Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        };
        if !bar.is_sane() {
            return Err(LoadError::InvalidBar { row: row_num });
        }
        bars.push(bar);
    }

    Ok(bars)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]`, the ISO `T` form, and RFC 3339.
///
/// Offsets in RFC 3339 input are normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Generate a deterministic random-walk series of `count` weekday bars.
///
/// The same `(count, seed)` always yields the same bars.
pub fn generate_synthetic_bars(count: usize, seed: u64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let Some(mut current) = NaiveDate::from_ymd_opt(2020, 1, 2) else {
        return bars;
    };

    while bars.len() < count {
        // Skip weekends (simple heuristic)
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        if let Some(timestamp) = current.and_hms_opt(0, 0, 0) {
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

/// Load synthetic bars with provenance attached.
pub fn load_synthetic(count: usize, seed: u64) -> LoadedData {
    LoadedData::new(generate_synthetic_bars(count, seed), DataSource::Synthetic { seed })
}

/// Deterministic BLAKE3 hash over timestamps and all OHLCV values.
pub fn compute_dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.timestamp.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
