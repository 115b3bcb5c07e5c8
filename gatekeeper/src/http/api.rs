//! Platform API surface

use async_trait::async_trait;

use crate::errors::BridgeError;
use crate::http::client::HttpClient;
use crate::models::deployment::{ConfigInstance, Deployment};
use crate::models::validation::{DeploymentValidation, RejectionError, ValidationOutcome};

/// Platform operations the event handlers depend on
///
/// Trait seam so handlers can run against a test double.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Retrieve a deployment with its relations expanded
    async fn retrieve_deployment(&self, deployment_id: &str) -> Result<Deployment, BridgeError>;

    /// Submit a deployment verdict
    async fn validate_deployment(
        &self,
        deployment_id: &str,
        verdict: &DeploymentValidation,
    ) -> Result<ValidationOutcome, BridgeError>;

    /// Retrieve a config instance with its content expanded
    async fn retrieve_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ConfigInstance, BridgeError>;

    /// Approve a config instance
    async fn approve_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
    ) -> Result<(), BridgeError>;

    /// Reject a config instance with structured errors
    async fn reject_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
        errors: Vec<RejectionError>,
    ) -> Result<(), BridgeError>;

    /// Request deployment of an approved config instance
    async fn deploy_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ValidationOutcome, BridgeError>;
}

#[async_trait]
impl PlatformApi for HttpClient {
    async fn retrieve_deployment(&self, deployment_id: &str) -> Result<Deployment, BridgeError> {
        HttpClient::retrieve_deployment(self, deployment_id).await
    }

    async fn validate_deployment(
        &self,
        deployment_id: &str,
        verdict: &DeploymentValidation,
    ) -> Result<ValidationOutcome, BridgeError> {
        HttpClient::validate_deployment(self, deployment_id, verdict).await
    }

    async fn retrieve_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ConfigInstance, BridgeError> {
        HttpClient::retrieve_config_instance(self, config_instance_id).await
    }

    async fn approve_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
    ) -> Result<(), BridgeError> {
        HttpClient::approve_config_instance(self, config_instance_id, message).await
    }

    async fn reject_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
        errors: Vec<RejectionError>,
    ) -> Result<(), BridgeError> {
        HttpClient::reject_config_instance(self, config_instance_id, message, errors).await
    }

    async fn deploy_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ValidationOutcome, BridgeError> {
        HttpClient::deploy_config_instance(self, config_instance_id).await
    }
}
