//! End-to-end config instance decision tests
//!
//! A valid instance is approved and then deployed; an invalid instance is
//! rejected with structured errors. Never both, never neither.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceExt;

use gatekeeper::models::validation::ParameterValidation;
use gatekeeper::validation::engine::ValidationEngine;
use gatekeeper::validation::policy::{InstanceReport, ValidationPolicy};

use common::{response_json, router_for, signed_webhook_request};

#[derive(Clone, Default)]
struct StubPlatform {
    approve_calls: Arc<AtomicUsize>,
    deploy_calls: Arc<AtomicUsize>,
    reject_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn spawn_stub_platform(stub: StubPlatform) -> String {
    let app = Router::new()
        .route("/config_instances/{id}", get(retrieve_config_instance))
        .route("/config_instances/{id}/approve", post(approve_config_instance))
        .route("/config_instances/{id}/reject", post(reject_config_instance))
        .route("/config_instances/{id}/deploy", post(deploy_config_instance))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn retrieve_config_instance(Path(id): Path<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": id,
        "target_status": "deployed",
        "content": {"sampling_hz": 10, "upload_interval_secs": 60},
    }))
}

async fn approve_config_instance(State(stub): State<StubPlatform>) -> Json<serde_json::Value> {
    stub.approve_calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"status": "approved"}))
}

async fn reject_config_instance(
    State(stub): State<StubPlatform>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    stub.reject_bodies.lock().unwrap().push(body);
    Json(serde_json::json!({"status": "rejected"}))
}

async fn deploy_config_instance(State(stub): State<StubPlatform>) -> Json<serde_json::Value> {
    stub.deploy_calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"effect": "deploy", "message": "config instance deploying"}))
}

/// Policy that fails every instance on one parameter
struct RejectEverythingPolicy;

impl ValidationPolicy for RejectEverythingPolicy {
    fn check_instance(&self, instance_id: &str, _content: &serde_json::Value) -> InstanceReport {
        InstanceReport {
            message: format!("config instance {} failed validation", instance_id),
            parameters: vec![ParameterValidation {
                message: "sampling rate above device limit".to_string(),
                path: vec!["sampling_hz".to_string()],
            }],
        }
    }
}

fn validated_event(config_instance_id: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "config_instance.target_status.validated",
        "data": {"config_instance": {"id": config_instance_id}},
    })
}

#[tokio::test]
async fn test_valid_instance_is_approved_then_deployed() {
    let stub = StubPlatform::default();
    let base_url = spawn_stub_platform(stub.clone()).await;
    let app = router_for(&base_url, ValidationEngine::with_default_policy());

    let response = app
        .oneshot(signed_webhook_request(&validated_event("ci_9")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "config instance validation handled successfully");

    assert_eq!(stub.approve_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.deploy_calls.load(Ordering::SeqCst), 1);
    assert!(stub.reject_bodies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_instance_is_rejected_with_structured_errors() {
    let stub = StubPlatform::default();
    let base_url = spawn_stub_platform(stub.clone()).await;
    let engine = ValidationEngine::new(Arc::new(RejectEverythingPolicy));
    let app = router_for(&base_url, engine);

    let response = app
        .oneshot(signed_webhook_request(&validated_event("ci_9")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "config instance validation handled successfully");

    assert_eq!(stub.approve_calls.load(Ordering::SeqCst), 0);
    assert_eq!(stub.deploy_calls.load(Ordering::SeqCst), 0);

    let rejections = stub.reject_bodies.lock().unwrap();
    assert_eq!(rejections.len(), 1);
    assert_eq!(
        rejections[0]["message"],
        "config instance ci_9 failed validation"
    );
    let errors = rejections[0]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["message"], "sampling rate above device limit");
    assert_eq!(errors[0]["parameter_path"], serde_json::json!(["sampling_hz"]));
}
