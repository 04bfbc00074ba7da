//! Optimize command implementation.

use anyhow::Result;
use scout_backtest::BacktestEngine;
use scout_config::AppConfig;
use scout_optimizer::{OptimizationOutcome, Optimizer};
use tracing::info;

use super::build_market_data;
use crate::cli::OptimizeArgs;

pub async fn run(args: OptimizeArgs, config: AppConfig) -> Result<()> {
    let data = build_market_data(&config, args.data.as_deref(), &[])?;
    let runner = BacktestEngine::new(data);

    let optimizer = Optimizer::new(runner, config.optimizer.clone()).with_progress(|p| {
        match p.eta {
            Some(eta) => println!(
                "  [{:>5.1}%] {}/{} grid points, eta {}s",
                p.percent,
                p.completed,
                p.total,
                eta.as_secs()
            ),
            None => println!("  [{:>5.1}%] deep validation", p.percent),
        }
    });

    println!("Searching strategy parameter grid...");
    let outcome = optimizer.run(&config).await?;
    println!("{}", render_outcome(&outcome));

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, serde_json::to_string_pretty(&outcome.ranked)?)?;
        info!("ranked grid saved to {:?}", save_path);
    }

    Ok(())
}

fn render_outcome(outcome: &OptimizationOutcome) -> String {
    let best = &outcome.best.stats;
    let baseline = &outcome.baseline;
    let improved = best.win_rate_pct > baseline.win_rate_pct
        || (best.win_rate_pct == baseline.win_rate_pct && best.net_wins() > baseline.net_wins());

    let mut s = String::new();

    s.push_str("═══════════════════════════════════════════════════════════\n");
    s.push_str("                  OPTIMIZATION RESULT                       \n");
    s.push_str("═══════════════════════════════════════════════════════════\n\n");

    s.push_str("BEST PARAMETERS\n");
    s.push_str("───────────────────────────────────────────────────────────\n");
    s.push_str(&format!("  {}\n\n", outcome.best.params));

    s.push_str("FULL-SAMPLE VALIDATION\n");
    s.push_str("───────────────────────────────────────────────────────────\n");
    s.push_str(&format!(
        "  {:<12} {:>10} {:>10} {:>10}\n",
        "", "Win Rate", "Net Wins", "Total PnL"
    ));
    s.push_str(&format!(
        "  {:<12} {:>9.2}% {:>10} {:>9.2}%\n",
        "best",
        best.win_rate_pct,
        best.net_wins(),
        best.total_pnl_pct
    ));
    s.push_str(&format!(
        "  {:<12} {:>9.2}% {:>10} {:>9.2}%\n\n",
        "baseline",
        baseline.win_rate_pct,
        baseline.net_wins(),
        baseline.total_pnl_pct
    ));

    if improved {
        s.push_str("  The best grid point beat the current configuration.\n");
    } else {
        s.push_str("  The current configuration held up; no change recommended.\n");
    }
    s.push_str("═══════════════════════════════════════════════════════════\n");
    s
}
