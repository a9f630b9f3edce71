//! Request dispatch and the two mapping operations.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::mapping::{DeviceMapping, MappingStore};
use crate::metrics;
use crate::notify::Notifier;

use super::request::{string_field, ApiRequest, HttpMethod, Operation};
use super::response::{ApiResponse, DevicePhoneNumbers};

/// Name of the device identifier in path parameters and bodies.
pub const DEVICE_ID: &str = "device_id";
/// Name of the phone number field in bodies.
pub const PHONE_NUMBER: &str = "phone_number";

const MSG_CREATED: &str = "Mapping added successfully";
const ERR_INVALID_REQUEST: &str = "Invalid request";
const ERR_INVALID_JSON: &str = "Invalid JSON format";
const ERR_CREATE_FAILED: &str = "Failed to process request";
const ERR_LIST_FAILED: &str = "Failed to fetch device mappings";

/// Handles create-mapping and list-mappings requests.
///
/// The store and the optional notifier are shared handles created once at
/// startup. Without a notifier, new mappings are not announced.
#[derive(Debug, Clone)]
pub struct DeviceMappingService {
    store: Arc<dyn MappingStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl DeviceMappingService {
    /// Create a service over `store`, announcing through `notifier` if given.
    pub fn new(store: Arc<dyn MappingStore>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { store, notifier }
    }

    /// Check if new mappings are announced.
    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Handle one request. Never fails: every outcome is a JSON response.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let start = Instant::now();
        info!(
            method = %request.method,
            path_params = ?request.path_params,
            "Received event"
        );
        debug!(body = ?request.body, "request body");

        let (operation, response) = self.dispatch(&request).await;
        metrics::record_request(operation, response.status_code, start);

        debug!(
            status = response.status_code,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request handled"
        );
        response
    }

    async fn dispatch(&self, request: &ApiRequest) -> (Operation, ApiResponse) {
        let body = match request.json_body() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "JSON decoding error");
                return (Operation::Rejected, ApiResponse::error(400, ERR_INVALID_JSON));
            }
        };

        match HttpMethod::parse(&request.method) {
            HttpMethod::Post => {
                let device_id = request
                    .path_param(DEVICE_ID)
                    .or_else(|| string_field(&body, DEVICE_ID));
                let phone_number = string_field(&body, PHONE_NUMBER);

                if let (Some(device_id), Some(phone_number)) = (device_id, phone_number) {
                    return (
                        Operation::CreateMapping,
                        self.create_response(device_id, phone_number).await,
                    );
                }
            }
            HttpMethod::Get => {
                if let Some(device_id) = request.path_param(DEVICE_ID) {
                    return (Operation::ListMappings, self.list_response(device_id).await);
                }
            }
            HttpMethod::Other(_) => {}
        }

        warn!(method = %request.method, "invalid request shape");
        (Operation::Rejected, ApiResponse::error(400, ERR_INVALID_REQUEST))
    }

    async fn create_response(&self, device_id: &str, phone_number: &str) -> ApiResponse {
        match self.create_mapping(device_id, phone_number).await {
            Ok(_) => ApiResponse::json(201, &json!({ "message": MSG_CREATED })),
            Err(e @ (ServiceError::Store(_) | ServiceError::Notify(_))) => {
                error!(error = ?e, device_id, phone_number, "Store or notify error");
                ApiResponse::error(500, ERR_CREATE_FAILED)
            }
            Err(e) => unhandled(e),
        }
    }

    async fn list_response(&self, device_id: &str) -> ApiResponse {
        let result = self.list_mappings(device_id).await.and_then(|numbers| {
            serde_json::to_value(numbers).map_err(ServiceError::from)
        });

        match result {
            Ok(body) => ApiResponse::json(200, &body),
            Err(e @ ServiceError::Store(_)) => {
                error!(error = ?e, device_id, "Store query error");
                ApiResponse::error(500, ERR_LIST_FAILED)
            }
            Err(e) => unhandled(e),
        }
    }

    /// Persist a mapping, then announce it if a notifier is configured.
    ///
    /// Writing an existing `(device_id, phone_number)` pair replaces the
    /// record. A failed announcement fails the operation even though the
    /// write has already landed.
    #[instrument(skip(self))]
    pub async fn create_mapping(&self, device_id: &str, phone_number: &str) -> Result<DeviceMapping> {
        let mapping = DeviceMapping::new(device_id, phone_number);

        {
            let _timer = metrics::timer_store_put();
            self.store.put(mapping.clone()).await?;
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.publish(&mapping.announcement()).await {
                metrics::inc_notify_failures();
                return Err(e.into());
            }
            debug!(topic = notifier.topic(), "mapping announced");
        }

        info!(table = self.store.table_name(), "mapping created");
        Ok(mapping)
    }

    /// Phone numbers mapped to `device_id`, in store order.
    #[instrument(skip(self))]
    pub async fn list_mappings(&self, device_id: &str) -> Result<DevicePhoneNumbers> {
        let items = {
            let _timer = metrics::timer_store_query();
            self.store.query_device(device_id).await?
        };

        Ok(DevicePhoneNumbers {
            device_id: device_id.to_string(),
            phone_numbers: items.into_iter().map(|m| m.phone_number).collect(),
        })
    }
}

fn unhandled(e: ServiceError) -> ApiResponse {
    error!(error = ?e, "Unhandled error");
    ApiResponse::error(500, e.to_string())
}
