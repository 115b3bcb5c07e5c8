//! Typed webhook events

use serde_json::Value;

use crate::errors::BridgeError;

/// Event tag for deployment validation requests
pub const DEPLOYMENT_VALIDATE: &str = "deployment.validate";

/// Event tag for config instances reaching a target status that needs validation
pub const CONFIG_INSTANCE_TARGET_STATUS_VALIDATED: &str =
    "config_instance.target_status.validated";

/// A webhook event, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// The platform requests validation of a deployment
    DeploymentValidate { deployment_id: String },

    /// A config instance reached a target status that requires a decision
    ConfigInstanceTargetStatusValidated { config_instance_id: String },

    /// An event kind this service does not act on
    Unknown { kind: String },
}

impl WebhookEvent {
    /// Unwrap a verified payload into a typed event
    ///
    /// Unrecognized tags still unwrap (as [`WebhookEvent::Unknown`]) so the
    /// dispatcher can acknowledge them; only a structurally missing `type`
    /// or `data` fails.
    pub fn unwrap(payload: &Value) -> Result<Self, BridgeError> {
        let kind = payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::ParseError("event type is missing".to_string()))?;

        let data = payload
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| BridgeError::ParseError("event data is missing".to_string()))?;

        match kind {
            DEPLOYMENT_VALIDATE => Ok(WebhookEvent::DeploymentValidate {
                deployment_id: entity_id(data, "deployment")?,
            }),
            CONFIG_INSTANCE_TARGET_STATUS_VALIDATED => {
                Ok(WebhookEvent::ConfigInstanceTargetStatusValidated {
                    config_instance_id: entity_id(data, "config_instance")?,
                })
            }
            other => Ok(WebhookEvent::Unknown {
                kind: other.to_string(),
            }),
        }
    }
}

fn entity_id(data: &serde_json::Map<String, Value>, entity: &str) -> Result<String, BridgeError> {
    data.get(entity)
        .and_then(|value| value.get("id"))
        .and_then(Value::as_str)
        .map(|id| id.to_string())
        .ok_or_else(|| BridgeError::ParseError(format!("event data has no {} id", entity)))
}
