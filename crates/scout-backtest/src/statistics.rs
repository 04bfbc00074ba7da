//! Backtest statistics.

use serde::{Deserialize, Serialize};
use scout_core::{Trade, TradeResult};

/// Aggregate outcome statistics for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BacktestStats {
    /// Signals that cleared the registration threshold
    pub total_signals: usize,
    /// Simulated trades registered
    pub trades_taken: usize,
    /// Trades closed at target
    pub wins: usize,
    /// Trades closed at stop
    pub losses: usize,
    /// Trades whose entry never filled in time
    pub expired: usize,
    /// Trades stopped out before filling
    pub invalidated: usize,
    /// Trades still open when the history ran out
    pub still_open: usize,
    /// Win rate over decided trades, percent
    pub win_rate_pct: f64,
    /// Sum of signed per-trade returns, percent
    pub total_pnl_pct: f64,
    /// Average winning return, percent
    pub avg_win_pct: f64,
    /// Average losing return, percent (negative)
    pub avg_loss_pct: f64,
    /// Gross profit over gross loss
    pub profit_factor: f64,
    /// Symbols that produced a usable history
    pub symbols_tested: usize,
    /// Candles walked across all symbols
    pub candles_processed: usize,
    gross_profit: f64,
    gross_loss: f64,
}

impl BacktestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one resolved (or abandoned) trade into the tally.
    pub fn record_trade(&mut self, trade: &Trade) {
        self.trades_taken += 1;
        match trade.result {
            TradeResult::Win => self.wins += 1,
            TradeResult::Loss => self.losses += 1,
            TradeResult::Expired => self.expired += 1,
            TradeResult::Invalidated => self.invalidated += 1,
            TradeResult::Pending => self.still_open += 1,
        }

        if let Some(pnl) = trade.pnl_pct {
            self.total_pnl_pct += pnl;
            if pnl > 0.0 {
                self.gross_profit += pnl;
            } else if pnl < 0.0 {
                self.gross_loss += pnl.abs();
            }
        }
    }

    /// Compute the derived ratios. Call once after all trades are in.
    pub fn finalize(&mut self) {
        let decided = self.wins + self.losses;
        if decided > 0 {
            self.win_rate_pct = self.wins as f64 * 100.0 / decided as f64;
        }
        if self.wins > 0 {
            self.avg_win_pct = self.gross_profit / self.wins as f64;
        }
        if self.losses > 0 {
            self.avg_loss_pct = -self.gross_loss / self.losses as f64;
        }
        if self.gross_loss > 0.0 {
            self.profit_factor = self.gross_profit / self.gross_loss;
        }
    }

    /// Wins minus losses, the optimizer's tie-breaker.
    pub fn net_wins(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scout_core::{TradeSide, TradeStatus};
    use uuid::Uuid;

    fn closed_trade(result: TradeResult, pnl: Option<f64>) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            symbol: "BTCUSDT".to_string(),
            exchange: "binance".to_string(),
            signal_time: 0,
            entry_date: Utc::now(),
            status: if result == TradeResult::Pending {
                TradeStatus::Open
            } else {
                TradeStatus::Closed
            },
            result,
            side: TradeSide::Long,
            entry_price: 100.0,
            take_profit: 110.0,
            stop_loss: 95.0,
            score: 80.0,
            is_filled: true,
            fill_time: Some(1),
            exit_price: None,
            exit_time: None,
            pnl_pct: pnl,
        }
    }

    #[test]
    fn test_tally_and_ratios() {
        let mut stats = BacktestStats::new();
        stats.record_trade(&closed_trade(TradeResult::Win, Some(10.0)));
        stats.record_trade(&closed_trade(TradeResult::Win, Some(6.0)));
        stats.record_trade(&closed_trade(TradeResult::Loss, Some(-4.0)));
        stats.record_trade(&closed_trade(TradeResult::Expired, Some(0.0)));
        stats.record_trade(&closed_trade(TradeResult::Pending, None));
        stats.finalize();

        assert_eq!(stats.trades_taken, 5);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.still_open, 1);
        assert!((stats.win_rate_pct - 66.66666666666667).abs() < 1e-9);
        assert!((stats.total_pnl_pct - 12.0).abs() < 1e-9);
        assert!((stats.avg_win_pct - 8.0).abs() < 1e-9);
        assert!((stats.avg_loss_pct + 4.0).abs() < 1e-9);
        assert!((stats.profit_factor - 4.0).abs() < 1e-9);
        assert_eq!(stats.net_wins(), 1);
    }

    #[test]
    fn test_empty_stats_have_no_ratios() {
        let mut stats = BacktestStats::new();
        stats.finalize();

        assert_eq!(stats.win_rate_pct, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.net_wins(), 0);
    }
}
