//! Notification sinks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use scout_core::{Notifier, NotifyError, Signal, Trade};

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Notifier that only writes to the log. Default sink when no webhook
/// is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_entry(&self, trade: &Trade) -> Result<(), NotifyError> {
        info!(
            symbol = %trade.symbol,
            side = %trade.side,
            entry = trade.entry_price,
            stop = trade.stop_loss,
            target = trade.take_profit,
            "trade filled"
        );
        Ok(())
    }

    async fn notify_exit(&self, trade: &Trade) -> Result<(), NotifyError> {
        info!(
            symbol = %trade.symbol,
            result = %trade.result,
            pnl_pct = trade.pnl_pct,
            "trade closed"
        );
        Ok(())
    }

    async fn notify_high_score(&self, signals: &[Signal]) -> Result<(), NotifyError> {
        for signal in signals {
            info!(
                symbol = %signal.symbol,
                score = signal.score,
                "high-quality signal"
            );
        }
        Ok(())
    }
}

/// Notifier that posts JSON events to a configured webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Send(e.to_string()))?;
        Ok(Self { client, url })
    }

    async fn post(&self, payload: &serde_json::Value) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Send(format!(
                "webhook returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_entry(&self, trade: &Trade) -> Result<(), NotifyError> {
        self.post(&json!({ "event": "entry", "trade": trade })).await
    }

    async fn notify_exit(&self, trade: &Trade) -> Result<(), NotifyError> {
        self.post(&json!({ "event": "exit", "trade": trade })).await
    }

    async fn notify_high_score(&self, signals: &[Signal]) -> Result<(), NotifyError> {
        self.post(&json!({ "event": "high_score", "signals": signals }))
            .await
    }
}
