//! Normalized request descriptor.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use strum::{EnumString, IntoStaticStr};

/// Transport-agnostic request handed to the service.
///
/// Deserializes from API-gateway style proxy events
/// (`httpMethod`, `pathParameters`, `body`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiRequest {
    /// HTTP method, compared case-sensitively.
    #[serde(rename = "httpMethod", default)]
    pub method: String,
    /// Path parameters extracted by the router.
    #[serde(rename = "pathParameters", default, deserialize_with = "null_as_empty")]
    pub path_params: HashMap<String, String>,
    /// Raw request body.
    #[serde(default)]
    pub body: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<HashMap<String, String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ApiRequest {
    /// Create a request with no path parameters or body.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    /// Add a path parameter.
    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Non-empty path parameter by name.
    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parse the body as JSON. An absent or blank body reads as `{}`.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        match self.body.as_deref().map(str::trim) {
            None | Some("") => Ok(Value::Object(Map::new())),
            Some(raw) => serde_json::from_str(raw),
        }
    }
}

/// Non-empty string field of a JSON object body.
pub fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

/// Methods the service dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum HttpMethod {
    /// Read mappings.
    #[strum(serialize = "GET")]
    Get,
    /// Create a mapping.
    #[strum(serialize = "POST")]
    Post,
    /// Anything else.
    #[strum(default)]
    Other(String),
}

impl HttpMethod {
    /// Classify a raw method string.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| Self::Other(raw.to_string()))
    }
}

/// Operation a request resolved to, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Create-mapping.
    CreateMapping,
    /// List-mappings.
    ListMappings,
    /// Rejected before dispatch.
    Rejected,
}
