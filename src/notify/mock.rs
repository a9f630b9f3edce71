//! Notifier double for unit testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::NotifyError;

use super::Notifier;

/// Notifier that records every published message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    topic: String,
    messages: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    /// Create a recording notifier for `topic`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            messages: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Toggle publish failures.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages published so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Failed {
                topic: self.topic.clone(),
                reason: "Mock publish failure".to_string(),
            });
        }

        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
        Ok(())
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages_in_order() {
        let notifier = RecordingNotifier::new("alerts");
        notifier.publish("first").await.unwrap();
        notifier.publish("second").await.unwrap();

        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_notifier_records_nothing() {
        let notifier = RecordingNotifier::new("alerts");
        notifier.set_fail(true);

        assert!(notifier.publish("lost").await.is_err());
        assert!(notifier.messages().is_empty());
    }
}
