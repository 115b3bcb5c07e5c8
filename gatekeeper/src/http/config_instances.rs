//! Config instance API client

use serde::Serialize;

use crate::errors::BridgeError;
use crate::http::client::HttpClient;
use crate::models::deployment::ConfigInstance;
use crate::models::validation::{RejectionError, ValidationOutcome};

/// Approval request body
#[derive(Debug, Clone, Serialize)]
pub struct ApproveRequest {
    pub message: String,
}

/// Rejection request body
#[derive(Debug, Clone, Serialize)]
pub struct RejectRequest {
    pub message: String,
    pub errors: Vec<RejectionError>,
}

impl HttpClient {
    /// Retrieve a config instance with its content expanded
    pub async fn retrieve_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ConfigInstance, BridgeError> {
        let path = format!("/config_instances/{}", config_instance_id);
        self.get(&path, &[("expand", "content")]).await
    }

    /// Approve a config instance
    pub async fn approve_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
    ) -> Result<(), BridgeError> {
        let path = format!("/config_instances/{}/approve", config_instance_id);
        let request = ApproveRequest {
            message: message.to_string(),
        };
        let _: serde_json::Value = self.post(&path, &request).await?;
        Ok(())
    }

    /// Reject a config instance with structured errors
    pub async fn reject_config_instance(
        &self,
        config_instance_id: &str,
        message: &str,
        errors: Vec<RejectionError>,
    ) -> Result<(), BridgeError> {
        let path = format!("/config_instances/{}/reject", config_instance_id);
        let request = RejectRequest {
            message: message.to_string(),
            errors,
        };
        let _: serde_json::Value = self.post(&path, &request).await?;
        Ok(())
    }

    /// Request deployment of an approved config instance
    pub async fn deploy_config_instance(
        &self,
        config_instance_id: &str,
    ) -> Result<ValidationOutcome, BridgeError> {
        let path = format!("/config_instances/{}/deploy", config_instance_id);
        self.post(&path, &serde_json::json!({})).await
    }
}
