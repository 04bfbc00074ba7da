//! Backtest report generation.

use serde::{Deserialize, Serialize};

use crate::runner::BacktestOptions;
use crate::statistics::BacktestStats;

/// Complete backtest report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Bounds the run was made with
    pub options: BacktestOptions,
    /// Aggregated statistics
    pub stats: BacktestStats,
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Symbols Tested:      {}\n", self.stats.symbols_tested));
        s.push_str(&format!("  History Walked:      {} days\n", self.options.days));
        s.push_str(&format!(
            "  Candles Processed:   {}\n",
            self.stats.candles_processed
        ));
        s.push('\n');

        s.push_str("SIGNALS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Qualifying Signals:  {}\n", self.stats.total_signals));
        s.push_str(&format!("  Trades Taken:        {}\n", self.stats.trades_taken));
        s.push('\n');

        s.push_str("OUTCOMES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Wins:                {}\n", self.stats.wins));
        s.push_str(&format!("  Losses:              {}\n", self.stats.losses));
        s.push_str(&format!("  Expired:             {}\n", self.stats.expired));
        s.push_str(&format!("  Invalidated:         {}\n", self.stats.invalidated));
        s.push_str(&format!("  Still Open:          {}\n", self.stats.still_open));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", self.stats.win_rate_pct));
        s.push('\n');

        s.push_str("RETURNS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total PnL:           {:.2}%\n", self.stats.total_pnl_pct));
        s.push_str(&format!("  Avg Win:             {:.2}%\n", self.stats.avg_win_pct));
        s.push_str(&format!("  Avg Loss:            {:.2}%\n", self.stats.avg_loss_pct));
        s.push_str(&format!("  Profit Factor:       {:.2}\n", self.stats.profit_factor));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let mut stats = BacktestStats::new();
        stats.symbols_tested = 5;
        stats.total_signals = 40;
        stats.trades_taken = 12;
        stats.wins = 8;
        stats.losses = 4;
        stats.win_rate_pct = 66.67;
        stats.total_pnl_pct = 31.5;

        let report = BacktestReport {
            options: BacktestOptions { limit: 5, days: 30 },
            stats,
        };

        let summary = report.summary();
        assert!(summary.contains("Win Rate"));
        assert!(summary.contains("66.67%"));
        assert!(summary.contains("30 days"));
    }

    #[test]
    fn test_report_round_trips_json() {
        let report = BacktestReport {
            options: BacktestOptions { limit: 5, days: 30 },
            stats: BacktestStats::new(),
        };

        let json = report.to_json().unwrap();
        let parsed: BacktestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
