//! Deployment entity models
//!
//! Read-only snapshots of platform entities, fetched per webhook and
//! discarded after the request. Relations the platform only returns on
//! request are optional; their absence after an expanded fetch is a
//! precondition failure in the caller.

use serde::{Deserialize, Serialize};

/// A release rolled out by a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Unique release ID
    pub id: String,

    /// Release version label
    pub version: String,
}

/// The device a deployment targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique device ID
    pub id: String,

    /// Human-readable device name
    pub name: String,
}

/// A configuration document targeted at a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInstance {
    /// Unique config instance ID
    pub id: String,

    /// Status the platform is moving the instance towards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_status: Option<String>,

    /// Configuration content; present only when fetched with expansion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

/// A deployment of a release to a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    /// Unique deployment ID
    pub id: String,

    /// Release being rolled out; present only when expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,

    /// Target device; present only when expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,

    /// Config instances carried by the deployment; present only when expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_instances: Option<Vec<ConfigInstance>>,
}
