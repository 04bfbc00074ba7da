//! Walk-forward backtesting engine.

mod report;
mod runner;
mod statistics;

pub use report::BacktestReport;
pub use runner::{BacktestEngine, BacktestOptions, BacktestRunner};
pub use statistics::BacktestStats;
