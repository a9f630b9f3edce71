//! Best-effort announcements for newly created mappings.

pub mod mock;
pub mod webhook;

use async_trait::async_trait;

use crate::error::NotifyError;

pub use mock::RecordingNotifier;
pub use webhook::WebhookNotifier;

/// Publish channel for human-readable alerts.
///
/// A service without a notifier simply skips publishing.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Publish `message` to the configured topic.
    async fn publish(&self, message: &str) -> Result<(), NotifyError>;

    /// Topic this notifier publishes to.
    fn topic(&self) -> &str;
}
