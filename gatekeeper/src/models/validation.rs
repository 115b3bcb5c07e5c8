//! Validation verdict models

use serde::{Deserialize, Serialize};

/// A problem at a specific location inside a config instance's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValidation {
    /// Explanation shown on the parameter level in the platform UI
    pub message: String,

    /// Ordered path segments locating the parameter inside the content
    pub path: Vec<String>,
}

/// Verdict for a single config instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInstanceValidation {
    /// Config instance ID the verdict applies to
    pub id: String,

    /// Summary shown on the config instance level in the platform UI
    pub message: String,

    /// Parameter-level findings, empty when the instance passed
    pub parameters: Vec<ParameterValidation>,
}

/// The complete verdict submitted back to the platform
///
/// Built bottom-up (parameters, then instance verdicts, then the
/// deployment verdict) and never mutated after construction. Serializes to
/// the exact nested mapping the platform's validate endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentValidation {
    /// Whether the deployment passes the deployment-level rules
    pub is_valid: bool,

    /// Summary shown on the deployment level in the platform UI
    pub message: String,

    /// Per-instance verdicts, in the order the instances were supplied
    pub config_instances: Vec<ConfigInstanceValidation>,
}

/// Structured error attached to a config instance rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionError {
    /// Explanation of the problem
    pub message: String,

    /// Ordered path segments locating the failing parameter
    pub parameter_path: Vec<String>,
}

impl From<ParameterValidation> for RejectionError {
    fn from(parameter: ParameterValidation) -> Self {
        Self {
            message: parameter.message,
            parameter_path: parameter.path,
        }
    }
}

/// Platform response to a submitted verdict or deploy request
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationOutcome {
    /// State transition the verdict caused, as reported by the platform
    pub effect: String,

    /// Narrative accompanying the effect
    pub message: String,
}

/// The platform's state transition after a verdict is submitted
///
/// The platform owns this enum's transitions; this service only classifies
/// the response. Unknown values are preserved so newer platform versions
/// keep working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Stage,
    Deploy,
    Reject,
    Void,
    Other(String),
}

impl Effect {
    /// Classify the platform's effect string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "none" => Effect::None,
            "stage" => Effect::Stage,
            "deploy" => Effect::Deploy,
            "reject" => Effect::Reject,
            "void" => Effect::Void,
            other => Effect::Other(other.to_string()),
        }
    }
}
