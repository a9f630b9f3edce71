//! HTTP webhook publisher.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::NotifyError;

use super::Notifier;

/// Message body posted to the webhook.
#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    topic: &'a str,
    message: &'a str,
}

/// Publishes topic messages by POSTing JSON to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    /// HTTP client for publish requests.
    http: reqwest::Client,
    /// Endpoint messages are posted to.
    url: String,
    /// Topic identifier carried in every message.
    topic: String,
}

impl WebhookNotifier {
    /// Create a notifier for `topic` posting to `url`.
    pub fn new(
        url: impl Into<String>,
        topic: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: url.into(),
            topic: topic.into(),
        })
    }

    /// Build a notifier from configuration.
    ///
    /// Returns `Ok(None)` when no topic is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, NotifyError> {
        let Some(topic) = config.topic() else {
            return Ok(None);
        };

        let url = config
            .notify_webhook_url
            .as_deref()
            .ok_or_else(|| NotifyError::Failed {
                topic: topic.to_string(),
                reason: "no webhook url configured".to_string(),
            })?;

        Self::new(url, topic, Duration::from_millis(config.notify_timeout_ms)).map(Some)
    }

    /// Endpoint messages are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip_all)]
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&PublishRequest {
                topic: &self.topic,
                message,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                topic: self.topic.clone(),
                status: status.as_u16(),
            });
        }

        debug!(topic = %self.topic, status = status.as_u16(), "published notification");
        Ok(())
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_without_topic_is_disabled() {
        let config = Config::default();
        assert!(WebhookNotifier::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn from_config_with_topic_builds_notifier() {
        let config = Config {
            sns_topic_arn: Some("device-alerts".to_string()),
            notify_webhook_url: Some("http://127.0.0.1:9/publish".to_string()),
            ..Config::default()
        };

        let notifier = WebhookNotifier::from_config(&config).unwrap().unwrap();
        assert_eq!(notifier.topic(), "device-alerts");
        assert_eq!(notifier.url(), "http://127.0.0.1:9/publish");
    }

    #[test]
    fn from_config_with_topic_but_no_url_fails() {
        let config = Config {
            sns_topic_arn: Some("device-alerts".to_string()),
            ..Config::default()
        };

        assert!(WebhookNotifier::from_config(&config).is_err());
    }

    #[test]
    fn publish_request_shape() {
        let body = serde_json::to_value(PublishRequest {
            topic: "device-alerts",
            message: "Device dev-1 is associated with +1",
        })
        .unwrap();

        assert_eq!(body["topic"], "device-alerts");
        assert_eq!(body["message"], "Device dev-1 is associated with +1");
    }
}
