//! HTTP API handlers.
//!
//! Axum requests are normalized into [`ApiRequest`]s and handed to the
//! mapping service; its [`ApiResponse`] is written back verbatim.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::warn;

use crate::handler::{ApiRequest, ApiResponse, DeviceMappingService};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Mapping service every device route delegates to.
    pub service: Arc<DeviceMappingService>,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(service: DeviceMappingService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Metrics handler - renders Prometheus text, 404 without a recorder.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => ApiResponse::error(404, "Not found").into_response(),
    }
}

/// Device route without a path parameter (`/devices`).
pub async fn devices(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    invoke(&state, method, HashMap::new(), body).await
}

/// Device route with a `device_id` path parameter (`/devices/:device_id`).
pub async fn device(
    State(state): State<AppState>,
    method: Method,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match params {
        Ok(Path(params)) => invoke(&state, method, params, body).await,
        Err(rejection) => {
            warn!(error = %rejection, "rejected path parameters");
            ApiResponse::error(400, "Invalid request").into_response()
        }
    }
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    ApiResponse::error(404, "Not found").into_response()
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    ApiResponse::error(405, "Method not allowed").into_response()
}

async fn invoke(
    state: &AppState,
    method: Method,
    path_params: HashMap<String, String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            return match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    ApiResponse::error(413, "Payload too large").into_response()
                }
                _ => ApiResponse::error(400, "Invalid request").into_response(),
            };
        }
    };

    let body = if body.is_empty() {
        None
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(body) => Some(body),
            Err(_) => return ApiResponse::error(400, "Invalid JSON format").into_response(),
        }
    };

    let request = ApiRequest {
        method: method.as_str().to_string(),
        path_params,
        body,
    };

    state.service.handle(request).await.into_response()
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}
