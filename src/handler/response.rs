//! Normalized response descriptor.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

/// Content type carried by every response.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Transport-agnostic response returned by the service.
///
/// Serializes to API-gateway proxy form (`statusCode`, `headers`, `body`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON object.
    pub body: String,
}

impl ApiResponse {
    /// Build a JSON response.
    pub fn json(status_code: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());

        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// Build an `{"error": ...}` response.
    pub fn error(status_code: u16, message: impl AsRef<str>) -> Self {
        Self::json(status_code, &json!({ "error": message.as_ref() }))
    }

    /// Body parsed back into JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Body of a successful list-mappings response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePhoneNumbers {
    /// Device that was queried.
    pub device_id: String,
    /// Phone numbers in store order.
    pub phone_numbers: Vec<String>,
}
