//! Integration tests for the device mapping service.
//!
//! These drive the full HTTP router and, for notifications, a local webhook
//! receiver bound to an ephemeral port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_test::assert_ok;
use tower::ServiceExt;

use device_mapping::api::{create_router, AppState};
use device_mapping::handler::{ApiRequest, DeviceMappingService};
use device_mapping::mapping::{InMemoryMappingStore, MappingStore};
use device_mapping::notify::{Notifier, WebhookNotifier};

fn router_with(notifier: Option<Arc<dyn Notifier>>) -> Router {
    let store: Arc<dyn MappingStore> = Arc::new(InMemoryMappingStore::new("DevicePhoneMapping"));
    create_router(AppState::new(DeviceMappingService::new(store, notifier)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn create_then_list_over_http() {
    let app = router_with(None);

    let (status, body) = send(
        &app,
        "POST",
        "/devices",
        Some(r#"{"device_id": "dev-1", "phone_number": "+15551230000"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Mapping added successfully"}));

    let (status, body) = send(&app, "GET", "/devices/dev-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"device_id": "dev-1", "phone_numbers": ["+15551230000"]})
    );
}

#[tokio::test]
async fn post_with_device_in_path() {
    let app = router_with(None);

    let (status, _) = send(&app, "POST", "/devices/dev-2", Some(r#"{"phone_number": "+1"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/devices/dev-2", Some(r#"{"phone_number": "+2"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/devices/dev-2", None).await;
    assert_eq!(body["phone_numbers"], json!(["+1", "+2"]));
}

#[tokio::test]
async fn bad_requests_over_http() {
    let app = router_with(None);

    let (status, body) = send(&app, "POST", "/devices", Some("{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid JSON format"}));

    let (status, body) = send(&app, "POST", "/devices", Some(r#"{"device_id": "dev-1"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request"}));

    let (status, body) = send(&app, "PUT", "/devices/dev-1", Some(r#"{"phone_number": "+1"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request"}));
}

#[tokio::test]
async fn proxy_event_round_trip() {
    let service = DeviceMappingService::new(
        Arc::new(InMemoryMappingStore::new("DevicePhoneMapping")),
        None,
    );

    let event: ApiRequest = serde_json::from_value(json!({
        "httpMethod": "POST",
        "pathParameters": null,
        "body": "{\"device_id\": \"dev-1\", \"phone_number\": \"+15551230000\"}"
    }))
    .unwrap();

    let response = serde_json::to_value(service.handle(event).await).unwrap();
    assert_eq!(
        response,
        json!({
            "statusCode": 201,
            "headers": {"Content-Type": "application/json"},
            "body": "{\"message\":\"Mapping added successfully\"}"
        })
    );
}

type Received = Arc<Mutex<Vec<Value>>>;

async fn receive(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
    received.lock().unwrap().push(body);
    StatusCode::OK
}

async fn spawn_webhook(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = if status.is_success() {
        Router::new()
            .route("/publish", post(receive))
            .with_state(received.clone())
    } else {
        Router::new().route("/publish", post(move || async move { status }))
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/publish", addr), received)
}

#[tokio::test]
async fn webhook_receives_announcement() {
    let (url, received) = spawn_webhook(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(url, "device-alerts", Duration::from_secs(5)).unwrap();
    let app = router_with(Some(Arc::new(notifier) as Arc<dyn Notifier>));

    let (status, _) = send(
        &app,
        "POST",
        "/devices",
        Some(r#"{"device_id": "dev-1", "phone_number": "+15551230000"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let received = received.lock().unwrap().clone();
    assert_eq!(
        received,
        vec![json!({
            "topic": "device-alerts",
            "message": "Device dev-1 is associated with +15551230000"
        })]
    );
}

#[tokio::test]
async fn webhook_rejection_fails_create() {
    let (url, _) = spawn_webhook(StatusCode::SERVICE_UNAVAILABLE).await;
    let notifier = WebhookNotifier::new(url, "device-alerts", Duration::from_secs(5)).unwrap();
    assert!(notifier.publish("hello").await.is_err());

    let app = router_with(Some(Arc::new(notifier) as Arc<dyn Notifier>));
    let (status, body) = send(
        &app,
        "POST",
        "/devices",
        Some(r#"{"device_id": "dev-1", "phone_number": "+1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to process request"}));
}

#[tokio::test]
async fn webhook_publish_direct() {
    let (url, received) = spawn_webhook(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(url, "device-alerts", Duration::from_secs(5)).unwrap();

    assert_ok!(notifier.publish("Device dev-9 is associated with +9").await);
    assert_eq!(received.lock().unwrap().len(), 1);
}
