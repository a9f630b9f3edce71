//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

use crate::error::{Result, ServiceError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Mapping Store ===
    /// Table that holds device mappings.
    #[serde(default = "default_table")]
    pub dynamodb_table: String,

    // === Notifications ===
    /// Topic new mappings are announced on. Unset disables publishing.
    #[serde(default)]
    pub sns_topic_arn: Option<String>,

    /// HTTP endpoint topic messages are posted to.
    #[serde(default)]
    pub notify_webhook_url: Option<String>,

    /// Publish request timeout in milliseconds.
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_table() -> String {
    "DevicePhoneMapping".to_string()
}

fn default_notify_timeout() -> u64 {
    5000
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dynamodb_table: default_table(),
            sns_topic_arn: None,
            notify_webhook_url: None,
            notify_timeout_ms: default_notify_timeout(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.dynamodb_table.trim().is_empty() {
            return Err(invalid("DYNAMODB_TABLE must not be empty"));
        }

        if self.notify_timeout_ms == 0 {
            return Err(invalid("NOTIFY_TIMEOUT_MS must be greater than 0"));
        }

        if self.notifications_enabled() {
            let raw = self
                .notify_webhook_url
                .as_deref()
                .ok_or_else(|| invalid("NOTIFY_WEBHOOK_URL is required when SNS_TOPIC_ARN is set"))?;

            let url = Url::parse(raw)
                .map_err(|e| invalid(format!("NOTIFY_WEBHOOK_URL is invalid: {}", e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(invalid("NOTIFY_WEBHOOK_URL must be an http or https URL"));
            }
        }

        Ok(())
    }

    /// Topic to publish on, if publishing is enabled.
    pub fn topic(&self) -> Option<&str> {
        self.sns_topic_arn.as_deref().filter(|t| !t.is_empty())
    }

    /// Check if new mappings should be announced.
    pub fn notifications_enabled(&self) -> bool {
        self.topic().is_some()
    }
}

fn invalid(reason: impl Into<String>) -> ServiceError {
    ServiceError::InvalidConfig(reason.into())
}
