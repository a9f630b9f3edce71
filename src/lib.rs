//! Device to phone number mapping service.
//!
//! Persists associations between a device identifier and one or more phone
//! numbers, and optionally announces each new association on a topic.
//!
//! # Operations
//!
//! ```text
//! POST /devices[/{device_id}]  {"device_id"?, "phone_number"}  -> 201
//! GET  /devices/{device_id}                                    -> 200 {"device_id", "phone_numbers"}
//! anything else                                                -> 400 {"error": "Invalid request"}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`mapping`]: Mapping records and the mapping store
//! - [`notify`]: Announcement publishers
//! - [`handler`]: Request dispatch and the create/list operations
//! - [`api`]: HTTP adapter plus health/metrics endpoints
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod metrics;
pub mod notify;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
pub use handler::{ApiRequest, ApiResponse, DeviceMappingService};
