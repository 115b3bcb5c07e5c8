//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::events::dispatcher::{dispatch, HandlerOutcome};
use crate::events::event::WebhookEvent;
use crate::server::state::ServerState;
use crate::webhook::verify::WebhookHeaders;

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Verification failure response
#[derive(Debug, Serialize)]
pub struct VerificationFailedResponse {
    pub valid: bool,
    pub message: String,
    pub errors: Vec<serde_json::Value>,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(MessageResponse {
        message: "ok".to_string(),
    })
}

/// Webhook handler
///
/// Verification failures are the caller's fault (400); everything after a
/// verified payload is this side's problem (500). Unhandled event kinds are
/// acknowledged, never errored.
pub async fn webhook_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    info!("Received webhook");

    let payload = match WebhookHeaders::from_header_map(&headers)
        .and_then(|webhook_headers| state.verifier.verify(&body, &webhook_headers))
    {
        Ok(payload) => payload,
        Err(e) => {
            error!("Webhook verification error: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(VerificationFailedResponse {
                    valid: false,
                    message: e.to_string(),
                    errors: Vec::new(),
                }),
            )
                .into_response();
        }
    };

    debug!("Webhook payload: {}", payload);

    let event = match WebhookEvent::unwrap(&payload) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook payload error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match dispatch(&state, event).await {
        Ok(HandlerOutcome::Handled(message)) => {
            (StatusCode::OK, Json(MessageResponse { message })).into_response()
        }
        Ok(HandlerOutcome::NoAction) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "no action required".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Webhook handler error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
