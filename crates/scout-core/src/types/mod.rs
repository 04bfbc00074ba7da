//! Core data types for the opportunity scanner.

mod candle;
mod consistency;
mod interval;
mod signal;
mod trade;

pub use candle::{Candle, CandleSeries};
pub use consistency::{ConsistencyMap, ConsistencyRecord, ConsistencyStatus};
pub use interval::Interval;
pub use signal::{
    ConfluenceType, Divergence, MomentumContext, MoneyFlow, PullbackContext, ScoreBreakdown,
    Signal, TradeSetup, TrendBias, TrendContext, TrendStructure,
};
pub use trade::{Trade, TradeResult, TradeSide, TradeStatus};
