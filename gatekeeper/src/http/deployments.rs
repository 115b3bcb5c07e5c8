//! Deployment API client

use crate::errors::BridgeError;
use crate::http::client::HttpClient;
use crate::models::deployment::Deployment;
use crate::models::validation::{DeploymentValidation, ValidationOutcome};

/// Relations that must be expanded before a deployment can be validated
const DEPLOYMENT_EXPANSIONS: [(&str, &str); 3] = [
    ("expand", "device"),
    ("expand", "release"),
    ("expand", "config_instances.content"),
];

impl HttpClient {
    /// Retrieve a deployment with its device, release and config instance
    /// content expanded
    pub async fn retrieve_deployment(&self, deployment_id: &str) -> Result<Deployment, BridgeError> {
        let path = format!("/deployments/{}", deployment_id);
        self.get(&path, &DEPLOYMENT_EXPANSIONS).await
    }

    /// Submit a deployment verdict and return the platform's effect
    pub async fn validate_deployment(
        &self,
        deployment_id: &str,
        verdict: &DeploymentValidation,
    ) -> Result<ValidationOutcome, BridgeError> {
        let path = format!("/deployments/{}/validate", deployment_id);
        self.post(&path, verdict).await
    }
}
