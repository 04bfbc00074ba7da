//! Signal types produced by the scoring engine.

use serde::{Deserialize, Serialize};

use super::{Interval, TradeSide};

/// Higher-timeframe trend bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    /// Close above fast EMA above slow EMA
    Long,
    /// Close below fast EMA below slow EMA
    Short,
    /// EMAs defined but not aligned
    #[default]
    None,
    /// Not enough history to compute the EMAs
    Unknown,
}

impl TrendBias {
    /// Check whether the bias points in a tradeable direction.
    pub fn is_directional(&self) -> bool {
        matches!(self, TrendBias::Long | TrendBias::Short)
    }

    /// Map the bias onto a trade side, if directional.
    pub fn side(&self) -> Option<TradeSide> {
        match self {
            TrendBias::Long => Some(TradeSide::Long),
            TrendBias::Short => Some(TradeSide::Short),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrendBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendBias::Long => write!(f, "LONG"),
            TrendBias::Short => write!(f, "SHORT"),
            TrendBias::None => write!(f, "NONE"),
            TrendBias::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Short-horizon trend structure: latest close vs the close three candles back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendStructure {
    Up,
    #[default]
    Down,
}

impl TrendStructure {
    /// The trade side implied by the structure alone.
    pub fn side(&self) -> TradeSide {
        match self {
            TrendStructure::Up => TradeSide::Long,
            TrendStructure::Down => TradeSide::Short,
        }
    }
}

impl std::fmt::Display for TrendStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendStructure::Up => write!(f, "UP"),
            TrendStructure::Down => write!(f, "DOWN"),
        }
    }
}

/// RSI divergence classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    #[default]
    None,
    /// Price lower low with RSI higher low (older pivot RSI below 50)
    Bullish,
    /// Price higher high with RSI lower high (older pivot RSI above 50)
    Bearish,
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Divergence::None => write!(f, "NONE"),
            Divergence::Bullish => write!(f, "BULLISH"),
            Divergence::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// OBV-versus-price money flow classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoneyFlow {
    #[default]
    Neutral,
    Bullish,
    Bearish,
}

impl std::fmt::Display for MoneyFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoneyFlow::Neutral => write!(f, "NEUTRAL"),
            MoneyFlow::Bullish => write!(f, "BULLISH"),
            MoneyFlow::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// How the entry level of a setup was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfluenceType {
    /// Structural level aligned with a Fibonacci retracement
    FibStructure,
    /// Structural level only
    StructureOnly,
    /// ATR-offset fallback entry
    AtrReversion,
}

impl std::fmt::Display for ConfluenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfluenceType::FibStructure => write!(f, "FIB_STRUCTURE"),
            ConfluenceType::StructureOnly => write!(f, "STRUCTURE_ONLY"),
            ConfluenceType::AtrReversion => write!(f, "ATR_REVERSION"),
        }
    }
}

/// Trend read derived from higher-timeframe candles.
///
/// Undefined values degrade to 0.0 rather than NaN so serialized signals
/// round-trip through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendContext {
    pub bias: TrendBias,
    pub structure: TrendStructure,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub adx: f64,
}

/// Momentum read derived from lower-timeframe candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MomentumContext {
    pub rsi: f64,
    pub divergence: Divergence,
    /// RSI inside the configured band
    pub momentum_ok: bool,
}

/// Pullback read against the recent swing range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PullbackContext {
    pub is_pullback: bool,
    /// Retracement depth into the swing range, in [0, 1]
    pub depth: f64,
    /// Pinbar rejection on the latest candle
    pub has_rejection: bool,
}

/// A computed trade plan: entry, protective stop and target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// |reward| / |risk|, rounded to 2 decimals, 0 when risk is 0
    pub risk_reward: f64,
    pub side: TradeSide,
    pub confluence: ConfluenceType,
}

impl TradeSetup {
    /// Risk per unit as an absolute price distance.
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop_loss).abs()
    }

    /// Reward per unit as an absolute price distance.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry).abs()
    }
}

/// Pre-clamp score composition, persisted with the signal for audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    pub trend: f64,
    pub structure: f64,
    pub money_flow: f64,
    pub timing: f64,
    /// Sum of applied penalties (non-negative magnitude)
    pub penalties: f64,
    /// Sum of applied bonuses
    pub bonuses: f64,
    /// Composite before the final [0, 100] clamp
    pub raw_total: f64,
}

/// A scored opportunity for one symbol, immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    /// Venue label of the market data provider
    pub source: String,
    pub htf: Interval,
    pub ltf: Interval,
    /// Latest close at scoring time
    pub price: f64,
    /// Composite opportunity score, clamped to [0, 100]
    pub score: f64,
    pub setup: Option<TradeSetup>,
    pub breakdown: ScoreBreakdown,
    pub trend: TrendContext,
    pub momentum: MomentumContext,
    pub pullback: PullbackContext,
    /// Scoring time as unix milliseconds
    pub timestamp: i64,
}

impl Signal {
    /// Check whether the signal carries a tradeable plan.
    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }
}
