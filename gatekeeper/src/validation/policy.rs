//! Pluggable validation policy

use serde_json::Value;

use crate::models::validation::ParameterValidation;

/// Findings for a single config instance
#[derive(Debug, Clone)]
pub struct InstanceReport {
    /// Summary shown on the config instance level in the platform UI
    pub message: String,

    /// Parameter-level findings; an instance with any finding fails
    pub parameters: Vec<ParameterValidation>,
}

impl InstanceReport {
    /// Whether the instance carries no failing parameters
    pub fn is_valid(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Business rules applied to each config instance's content
///
/// Implementations must be pure: same content, same report.
pub trait ValidationPolicy: Send + Sync {
    /// Inspect one instance's content and report findings
    fn check_instance(&self, instance_id: &str, content: &Value) -> InstanceReport;
}

/// Policy that accepts every config instance
///
/// Replace with the organization's rules when wiring the app.
#[derive(Debug, Default)]
pub struct AcceptAllPolicy;

impl ValidationPolicy for AcceptAllPolicy {
    fn check_instance(&self, instance_id: &str, _content: &Value) -> InstanceReport {
        InstanceReport {
            message: format!("config instance {} passed validation", instance_id),
            parameters: Vec::new(),
        }
    }
}
