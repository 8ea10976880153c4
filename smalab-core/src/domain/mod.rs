//! Domain types for SMALab

pub mod bar;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use position::PositionState;
pub use signal::{Signal, SignaledBar};
pub use trade::{Trade, TradeReason, TradeSide};
