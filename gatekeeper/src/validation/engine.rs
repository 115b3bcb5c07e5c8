//! Deployment validation engine

use std::sync::Arc;

use crate::errors::BridgeError;
use crate::models::deployment::ConfigInstance;
use crate::models::validation::{ConfigInstanceValidation, DeploymentValidation};
use crate::validation::policy::{AcceptAllPolicy, InstanceReport, ValidationPolicy};

/// Runs the validation policy over a deployment's config instances
pub struct ValidationEngine {
    policy: Arc<dyn ValidationPolicy>,
}

impl ValidationEngine {
    /// Create an engine with the given policy
    pub fn new(policy: Arc<dyn ValidationPolicy>) -> Self {
        Self { policy }
    }

    /// Create an engine with the default accept-all policy
    pub fn with_default_policy() -> Self {
        Self::new(Arc::new(AcceptAllPolicy))
    }

    /// Evaluate a single config instance's content
    pub fn check_instance(&self, instance_id: &str, content: &serde_json::Value) -> InstanceReport {
        self.policy.check_instance(instance_id, content)
    }

    /// Produce the deployment verdict for a sequence of config instances
    ///
    /// Instances appear in the verdict in input order. Every instance must
    /// carry content; missing content means the upstream fetch was
    /// incomplete and fails the whole call before any verdict is built.
    pub fn validate(
        &self,
        instances: &[ConfigInstance],
    ) -> Result<DeploymentValidation, BridgeError> {
        let mut with_content = Vec::with_capacity(instances.len());
        for instance in instances {
            match &instance.content {
                Some(content) => with_content.push((instance, content)),
                None => {
                    return Err(BridgeError::PreconditionError(format!(
                        "config instance {} has no content",
                        instance.id
                    )))
                }
            }
        }

        let mut config_instances = Vec::with_capacity(with_content.len());
        for (instance, content) in with_content {
            let report = self.policy.check_instance(&instance.id, content);
            config_instances.push(ConfigInstanceValidation {
                id: instance.id.clone(),
                message: report.message,
                parameters: report.parameters,
            });
        }

        // Reference deployment-level rule: valid unless any instance
        // carries failing parameters.
        let is_valid = config_instances.iter().all(|verdict| verdict.parameters.is_empty());
        let message = if is_valid {
            "all config instances passed validation".to_string()
        } else {
            "one or more config instances failed validation".to_string()
        };

        Ok(DeploymentValidation {
            is_valid,
            message,
            config_instances,
        })
    }
}
