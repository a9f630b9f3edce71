//! Unified error types for the mapping service.

use thiserror::Error;

/// Unified error type for the mapping service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mapping store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Notification publish error.
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mapping store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected by the backend.
    #[error("put into {table} rejected: {reason}")]
    PutRejected {
        /// Table the write targeted.
        table: String,
        /// Reason for rejection.
        reason: String,
    },

    /// A query was rejected by the backend.
    #[error("query on {table} for device {device_id} rejected: {reason}")]
    QueryRejected {
        /// Table the query targeted.
        table: String,
        /// Partition key queried.
        device_id: String,
        /// Reason for rejection.
        reason: String,
    },
}

/// Notification publish errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Publish endpoint answered with a non-success status.
    #[error("publish to {topic} rejected with status {status}")]
    Rejected {
        /// Topic the message was addressed to.
        topic: String,
        /// HTTP status returned.
        status: u16,
    },

    /// Publish failed for another reason.
    #[error("publish to {topic} failed: {reason}")]
    Failed {
        /// Topic the message was addressed to.
        topic: String,
        /// Reason for failure.
        reason: String,
    },

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
