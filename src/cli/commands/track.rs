//! Track command implementation.

use std::sync::Arc;

use anyhow::Result;
use scout_config::AppConfig;
use scout_data::{BinanceMarketData, JsonStore};
use scout_tracker::Tracker;
use tracing::info;

use super::build_notifier;

/// Resolve open forward-test trades against fresh candles, registering
/// nothing new.
pub async fn run(config: AppConfig) -> Result<()> {
    let data = Arc::new(BinanceMarketData::new(config.data.clone())?);
    let store = Arc::new(JsonStore::new(&config.store.path)?);
    let notifier = build_notifier(&config)?;

    let tracker = Tracker::new(data, store, notifier, config);
    let report = tracker.process(&[]).await?;

    info!(
        filled = report.filled,
        closed = report.closed,
        open = report.open,
        "tracking pass complete"
    );
    println!("Forward-test trades resolved");
    println!("  filled this pass:  {}", report.filled);
    println!("  closed this pass:  {}", report.closed);
    println!("  still open:        {}", report.open);

    Ok(())
}
