//! Device mapping record types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One persisted association between a device and a phone number.
///
/// `device_id` is the partition key; `(device_id, phone_number)` is the record
/// key. Records are never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMapping {
    /// Device identifier (partition key).
    pub device_id: String,
    /// Associated phone number (sort key).
    pub phone_number: String,
    /// Unix timestamp (seconds) of the write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl DeviceMapping {
    /// Create a mapping stamped with the current time.
    pub fn new(device_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            phone_number: phone_number.into(),
            created_at: Some(OffsetDateTime::now_utc().unix_timestamp()),
        }
    }

    /// Record key within the store.
    pub fn key(&self) -> (&str, &str) {
        (&self.device_id, &self.phone_number)
    }

    /// Human-readable announcement for this mapping.
    pub fn announcement(&self) -> String {
        format!(
            "Device {} is associated with {}",
            self.device_id, self.phone_number
        )
    }
}
