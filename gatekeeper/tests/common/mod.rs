//! Shared helpers for integration tests

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use secrecy::SecretString;

use gatekeeper::http::client::HttpClient;
use gatekeeper::server::serve::build_router;
use gatekeeper::server::state::ServerState;
use gatekeeper::validation::engine::ValidationEngine;
use gatekeeper::webhook::verify::SignatureVerifier;

pub const TEST_SECRET: &str = "whsec_dGhpcy1pcy1hLXRlc3Qtc2lnbmluZy1rZXk=";

pub fn verifier() -> SignatureVerifier {
    let secret = SecretString::from(TEST_SECRET.to_string());
    SignatureVerifier::new(&secret, Duration::from_secs(300)).unwrap()
}

/// Build the service router wired to a platform at `base_url`
pub fn router_for(base_url: &str, engine: ValidationEngine) -> axum::Router {
    let api_key = SecretString::from("test-api-key".to_string());
    let platform = Arc::new(HttpClient::new(base_url, api_key).unwrap());
    let state = ServerState::new(verifier(), platform, engine);
    build_router(Arc::new(state))
}

/// Build a correctly signed webhook POST request for `payload`
pub fn signed_webhook_request(payload: &serde_json::Value) -> Request<Body> {
    let body = serde_json::to_vec(payload).unwrap();
    let id = format!("msg_{}", uuid::Uuid::new_v4().simple());
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = verifier().sign(&id, &timestamp, &body);

    Request::builder()
        .method("POST")
        .uri("/webhooks/platform")
        .header("content-type", "application/json")
        .header("webhook-id", id)
        .header("webhook-timestamp", timestamp)
        .header("webhook-signature", signature)
        .body(Body::from(body))
        .unwrap()
}

/// Read a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
