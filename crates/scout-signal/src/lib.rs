//! Multi-pillar opportunity scoring engine.
//!
//! `score` is a pure, synchronous function: given two candle series
//! and a strategy configuration it produces a [`Signal`] with a final
//! score in [0, 100]. Sub-computations on too-short history degrade to
//! neutral classifications instead of failing, so the call never
//! errors for valid candle input and is safe to run concurrently for
//! different symbols.
//!
//! [`Signal`]: scout_core::Signal

pub mod flow;
pub mod momentum;
pub mod pullback;
pub mod score;
pub mod setup;
pub mod trend;
pub mod volatility;

pub use flow::{flow_context, notional_24h, volume_contraction, FlowContext};
pub use momentum::{momentum_context, scan_divergence};
pub use pullback::pullback_context;
pub use score::{score, ScoreRequest};
pub use setup::build_setup;
pub use trend::trend_context;
pub use volatility::{volatility_context, VolatilityContext};

/// Candles defining the swing range used for pullback depth, stops
/// and Fibonacci retracements.
pub const SWING_RANGE_LOOKBACK: usize = 50;

/// Candles searched for the take-profit swing extreme.
pub const TARGET_LOOKBACK: usize = 120;
