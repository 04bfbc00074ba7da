//! CLI command implementations.

pub mod backtest;
pub mod optimize;
pub mod scan;
pub mod track;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use scout_config::AppConfig;
use scout_core::{MarketData, Notifier};
use scout_data::{BinanceMarketData, CsvMarketData, LogNotifier, PinnedUniverse, WebhookNotifier};

/// Market data for a run: a CSV directory when given, the live venue
/// otherwise, optionally pinned to an explicit symbol list.
pub(crate) fn build_market_data(
    config: &AppConfig,
    data_dir: Option<&Path>,
    symbols: &[String],
) -> Result<Arc<dyn MarketData>> {
    let source: Arc<dyn MarketData> = match data_dir {
        Some(dir) => Arc::new(CsvMarketData::new(dir)?),
        None => Arc::new(BinanceMarketData::new(config.data.clone())?),
    };
    if symbols.is_empty() {
        return Ok(source);
    }
    Ok(Arc::new(PinnedUniverse::new(source, symbols.to_vec())))
}

/// Webhook sink when configured, log-only otherwise.
pub(crate) fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())?),
        None => Arc::new(LogNotifier),
    };
    Ok(notifier)
}
