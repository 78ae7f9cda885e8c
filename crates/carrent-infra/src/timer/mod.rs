//! Ticker implementations.

mod manual;
mod tokio_ticker;

pub use manual::ManualTicker;
pub use tokio_ticker::TokioTicker;
