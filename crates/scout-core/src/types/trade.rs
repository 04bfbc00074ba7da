//! Forward-test trade types and lifecycle enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Signal;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            TradeSide::Long => TradeSide::Short,
            TradeSide::Short => TradeSide::Long,
        }
    }

    /// Get the sign for pnl calculations (+1 for long, -1 for short).
    pub fn sign(&self) -> f64 {
        match self {
            TradeSide::Long => 1.0,
            TradeSide::Short => -1.0,
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Long => write!(f, "LONG"),
            TradeSide::Short => write!(f, "SHORT"),
        }
    }
}

/// Lifecycle status of a forward-test trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Awaiting fill or resolution
    Open,
    /// Resolved; no further mutation
    Closed,
}

impl TradeStatus {
    /// Check if the trade is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Closed)
    }
}

/// Outcome of a forward-test trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    /// Still open
    Pending,
    /// Target reached after fill
    Win,
    /// Stop reached after fill
    Loss,
    /// Fill window elapsed before entry traded
    Expired,
    /// Stop traded before entry ever did
    Invalidated,
}

impl TradeResult {
    /// Check if the result is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeResult::Pending)
    }
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Pending => write!(f, "PENDING"),
            TradeResult::Win => write!(f, "WIN"),
            TradeResult::Loss => write!(f, "LOSS"),
            TradeResult::Expired => write!(f, "EXPIRED"),
            TradeResult::Invalidated => write!(f, "INVALIDATED"),
        }
    }
}

/// A forward-test trade registered from a qualifying signal.
///
/// Created at registration, mutated only by the tracker's resolution pass,
/// immutable once `status` is `Closed`. `result` is `Pending` iff the trade
/// is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade ID
    pub id: Uuid,
    pub symbol: String,
    /// Venue label the signal came from
    pub exchange: String,
    /// Timestamp of the originating signal (unix ms); candles newer than
    /// this drive resolution
    pub signal_time: i64,
    /// When the trade was registered
    pub entry_date: DateTime<Utc>,
    pub status: TradeStatus,
    pub result: TradeResult,
    pub side: TradeSide,
    pub entry_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    /// Score of the originating signal
    pub score: f64,
    /// Whether price has traded through the entry
    pub is_filled: bool,
    /// Open time of the candle that filled the entry (unix ms)
    pub fill_time: Option<i64>,
    pub exit_price: Option<f64>,
    /// Open time of the candle that closed the trade (unix ms)
    pub exit_time: Option<i64>,
    /// Signed percentage return from entry to exit
    pub pnl_pct: Option<f64>,
}

impl Trade {
    /// Build a trade from a signal carrying a setup. Returns None when the
    /// signal has no trade plan.
    pub fn from_signal(signal: &Signal) -> Option<Self> {
        let setup = signal.setup.as_ref()?;
        Some(Self {
            id: Uuid::new_v4(),
            symbol: signal.symbol.clone(),
            exchange: signal.source.clone(),
            signal_time: signal.timestamp,
            entry_date: Utc::now(),
            status: TradeStatus::Open,
            result: TradeResult::Pending,
            side: setup.side,
            entry_price: setup.entry,
            take_profit: setup.take_profit,
            stop_loss: setup.stop_loss,
            score: signal.score,
            is_filled: false,
            fill_time: None,
            exit_price: None,
            exit_time: None,
            pnl_pct: None,
        })
    }

    /// Check if the trade is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Signed percentage return from entry to the given price.
    pub fn pnl_at(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (price - self.entry_price) / self.entry_price * 100.0 * self.side.sign()
    }

    /// Mark the entry as filled at the given candle time.
    pub fn fill(&mut self, time: i64) {
        self.is_filled = true;
        self.fill_time = Some(time);
    }

    /// Close the trade with a terminal result. No-op if already closed.
    pub fn close(&mut self, result: TradeResult, exit_price: Option<f64>, time: i64, pnl_pct: f64) {
        if self.status.is_terminal() {
            return;
        }
        self.status = TradeStatus::Closed;
        self.result = result;
        self.exit_price = exit_price;
        self.exit_time = Some(time);
        self.pnl_pct = Some(pnl_pct);
    }
}
