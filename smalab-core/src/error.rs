//! Engine errors. Both variants are raised before any bar is simulated.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("input series has no bars")]
    EmptySeries,
}
