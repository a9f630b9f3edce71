//! HTTP API route definitions.

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    device, devices, health, method_not_allowed, metrics, not_found, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/metrics", get(metrics).fallback(method_not_allowed))
        // Device mapping endpoints; method dispatch happens in the service
        .route("/devices", any(devices))
        .route("/devices/", any(devices))
        .route("/devices/:device_id", any(device))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
