//! Event dispatch and handling

use tracing::{info, warn};

use crate::errors::BridgeError;
use crate::events::event::WebhookEvent;
use crate::models::validation::{Effect, RejectionError};
use crate::server::state::ServerState;

/// Outcome of dispatching a single event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The event was routed to a handler, which produced this message
    Handled(String),

    /// The event kind is not one this service acts on
    NoAction,
}

/// Route a typed event to its handler
///
/// Each request starts unhandled; exactly one supported tag per event kind
/// transitions it to handled. Every other tag is acknowledged as a no-op.
pub async fn dispatch(
    state: &ServerState,
    event: WebhookEvent,
) -> Result<HandlerOutcome, BridgeError> {
    match event {
        WebhookEvent::DeploymentValidate { deployment_id } => {
            let message = handle_deployment_validate(state, &deployment_id).await?;
            Ok(HandlerOutcome::Handled(message))
        }
        WebhookEvent::ConfigInstanceTargetStatusValidated { config_instance_id } => {
            let message = handle_config_instance_validated(state, &config_instance_id).await?;
            Ok(HandlerOutcome::Handled(message))
        }
        WebhookEvent::Unknown { kind } => {
            info!("Ignoring unhandled event type: {}", kind);
            Ok(HandlerOutcome::NoAction)
        }
    }
}

/// Validate a deployment and report the verdict to the platform
async fn handle_deployment_validate(
    state: &ServerState,
    deployment_id: &str,
) -> Result<String, BridgeError> {
    let deployment = state.platform.retrieve_deployment(deployment_id).await?;

    let release = deployment.release.ok_or_else(|| {
        BridgeError::PreconditionError(format!("deployment {} has no release", deployment.id))
    })?;
    let device = deployment.device.ok_or_else(|| {
        BridgeError::PreconditionError(format!("deployment {} has no device", deployment.id))
    })?;
    let config_instances = deployment.config_instances.ok_or_else(|| {
        BridgeError::PreconditionError(format!(
            "deployment {} has no config instances",
            deployment.id
        ))
    })?;

    info!(
        "Validating deployment to device {} for release {}",
        device.name, release.version
    );

    let verdict = state.engine.validate(&config_instances)?;
    let outcome = state
        .platform
        .validate_deployment(&deployment.id, &verdict)
        .await?;

    report_effect(&Effect::parse(&outcome.effect), &outcome.message);

    Ok("deployment validation handled successfully".to_string())
}

/// Log the platform's state transition after a verdict submission
fn report_effect(effect: &Effect, message: &str) {
    match effect {
        Effect::None => {
            info!("The validation had no effect on the deployment: {}", message);
        }
        Effect::Stage => {
            info!("The deployment was approved; approval was required for staging, so it is now staged");
        }
        Effect::Deploy => {
            info!("The deployment was approved; approval was required for deploying, so it is now deploying");
        }
        Effect::Reject => {
            info!("The deployment was rejected");
        }
        Effect::Void => {
            info!("The deployment was in an invalid state for validation: {}", message);
        }
        Effect::Other(kind) => {
            warn!("Validation effect {}: {}", kind, message);
        }
    }
}

/// Decide whether a config instance proceeds to deploy or is rejected
///
/// Exactly one of approve-then-deploy or reject runs per instance.
async fn handle_config_instance_validated(
    state: &ServerState,
    config_instance_id: &str,
) -> Result<String, BridgeError> {
    let instance = state
        .platform
        .retrieve_config_instance(config_instance_id)
        .await?;

    let content = instance.content.as_ref().ok_or_else(|| {
        BridgeError::PreconditionError(format!("config instance {} has no content", instance.id))
    })?;

    let report = state.engine.check_instance(&instance.id, content);

    if report.is_valid() {
        state
            .platform
            .approve_config_instance(&instance.id, &report.message)
            .await?;
        let outcome = state.platform.deploy_config_instance(&instance.id).await?;
        info!(
            "Config instance {} approved, deploy requested: {}",
            instance.id, outcome.message
        );
    } else {
        let errors: Vec<RejectionError> = report
            .parameters
            .iter()
            .cloned()
            .map(RejectionError::from)
            .collect();
        state
            .platform
            .reject_config_instance(&instance.id, &report.message, errors)
            .await?;
        info!("Config instance {} rejected", instance.id);
    }

    Ok("config instance validation handled successfully".to_string())
}
