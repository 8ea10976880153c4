//! Serializable backtest configuration, loaded from TOML.
//!
//! ```toml
//! [backtest]
//! symbol = "AAPL"
//! initial_capital = 10000.0
//!
//! [signal]
//! short_window = 10
//! long_window = 40
//!
//! [risk]
//! stop_loss_pct = 0.01
//! take_profit_pct = 0.5
//!
//! [data]
//! path = "data/aapl.csv"
//! ```
//!
//! Every section and field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smalab_core::engine::EngineConfig;
use thiserror::Error;
use tracing::warn;

/// Unique identifier for a backtest configuration (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for a single backtest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub signal: SignalSection,
    pub risk: RiskSection,
    pub data: DataSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    /// Run label; defaults to `MAC_{symbol}_{short}_{long}`.
    pub name: Option<String>,
    pub symbol: String,
    pub initial_capital: f64,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            name: None,
            symbol: "SPY".into(),
            initial_capital: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSection {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for SignalSection {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSection {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl Default for RiskSection {
    fn default() -> Self {
        Self {
            stop_loss_pct: 0.01,
            take_profit_pct: 0.5,
        }
    }
}

/// Where bars come from: a CSV file, or a seeded synthetic random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub path: Option<PathBuf>,
    /// When set (and `path` is not), generate this many synthetic bars.
    pub synthetic_bars: Option<usize>,
    pub seed: u64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            path: None,
            synthetic_bars: None,
            seed: 42,
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine or signal generator cannot use.
    ///
    /// An inverted window pair is legal but almost certainly a mistake, so it
    /// only logs a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let SignalSection {
            short_window,
            long_window,
        } = self.signal;
        if short_window == 0 || long_window == 0 {
            return Err(ConfigError::Invalid(format!(
                "windows must be >= 1 (short={short_window}, long={long_window})"
            )));
        }
        if short_window >= long_window {
            warn!(
                short_window,
                long_window, "short_window >= long_window; crossover semantics are inverted"
            );
        }
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        self.engine_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            self.backtest.initial_capital,
            self.risk.stop_loss_pct,
            self.risk.take_profit_pct,
        )
    }

    pub fn display_name(&self) -> String {
        self.backtest.name.clone().unwrap_or_else(|| {
            format!(
                "MAC_{}_{}_{}",
                self.backtest.symbol, self.signal.short_window, self.signal.long_window
            )
        })
    }

    /// Deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        // Plain structs of numbers, strings, and paths always serialize.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Copy of this config with a different window pair.
    pub fn with_windows(&self, short_window: usize, long_window: usize) -> Self {
        let mut config = self.clone();
        config.signal = SignalSection {
            short_window,
            long_window,
        };
        config
    }
}
