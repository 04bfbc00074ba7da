//! Scan command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use scout_config::AppConfig;
use scout_data::{BinanceMarketData, JsonStore};
use scout_scanner::{ScanReport, Scanner};
use scout_tracker::Tracker;
use tracing::info;

use super::build_notifier;
use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config: AppConfig) -> Result<()> {
    let data = Arc::new(BinanceMarketData::new(config.data.clone())?);
    let store = Arc::new(JsonStore::new(&config.store.path)?);
    let notifier = build_notifier(&config)?;

    let scanner = Scanner::new(
        Arc::clone(&data),
        Arc::clone(&store),
        Arc::clone(&notifier),
        config.clone(),
    );
    let tracker = Tracker::new(data, store, notifier, config.clone());

    loop {
        let started = Utc::now();
        let report = scanner.run_cycle().await?;
        println!("{}", render_report(&report, started));

        if !args.no_track {
            let tracked = tracker.process(&report.signals).await?;
            info!(
                registered = tracked.registered,
                filled = tracked.filled,
                closed = tracked.closed,
                open = tracked.open,
                "forward test updated"
            );
        }

        if !args.watch {
            break;
        }
        let minutes = config.scan.interval_minutes;
        info!(minutes, "next scan scheduled");
        tokio::time::sleep(Duration::from_secs(minutes as u64 * 60)).await;
    }

    Ok(())
}

fn render_report(report: &ScanReport, started: DateTime<Utc>) -> String {
    let mut s = String::new();

    s.push_str("═══════════════════════════════════════════════════════════\n");
    s.push_str("                      MARKET SCAN                           \n");
    s.push_str("═══════════════════════════════════════════════════════════\n");
    s.push_str(&format!(
        "  {}   scanned {}   dropped {}\n",
        started.format("%Y-%m-%d %H:%M UTC"),
        report.scanned,
        report.dropped
    ));
    s.push_str("───────────────────────────────────────────────────────────\n");

    if report.signals.is_empty() {
        s.push_str("  no opportunities this cycle\n");
    }
    for signal in &report.signals {
        let side = signal
            .setup
            .as_ref()
            .map(|setup| setup.side.to_string())
            .unwrap_or_default();
        let status = report
            .statuses
            .get(&signal.symbol)
            .map(|status| format!("[{status}]"))
            .unwrap_or_default();
        s.push_str(&format!(
            "  {:<12} {:>5.1}  {:<5}  {}\n",
            signal.symbol, signal.score, side, status
        ));
    }

    s.push_str("═══════════════════════════════════════════════════════════\n");
    s
}
