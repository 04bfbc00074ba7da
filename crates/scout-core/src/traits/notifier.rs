//! Notifier trait for trade and signal alerts.

use crate::error::NotifyError;
use crate::types::{Signal, Trade};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound notification sink.
///
/// All deliveries are fire-and-forget: call sites log failures and carry
/// on, and no core state may depend on a delivery succeeding.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A forward-test trade was filled.
    async fn notify_entry(&self, trade: &Trade) -> Result<(), NotifyError>;

    /// A forward-test trade was closed.
    async fn notify_exit(&self, trade: &Trade) -> Result<(), NotifyError>;

    /// A scan cycle produced high-quality signals.
    async fn notify_high_score(&self, signals: &[Signal]) -> Result<(), NotifyError>;
}

// The sink is picked at runtime, so call sites hold `Arc<dyn Notifier>`.
#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn notify_entry(&self, trade: &Trade) -> Result<(), NotifyError> {
        (**self).notify_entry(trade).await
    }

    async fn notify_exit(&self, trade: &Trade) -> Result<(), NotifyError> {
        (**self).notify_exit(trade).await
    }

    async fn notify_high_score(&self, signals: &[Signal]) -> Result<(), NotifyError> {
        (**self).notify_high_score(signals).await
    }
}
