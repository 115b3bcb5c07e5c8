//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::BridgeError;

/// Timeout applied to every outbound platform call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for platform communication
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, BridgeError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BridgeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP GET failed: {} - {}", status, body);
            return Err(BridgeError::ApiError(format!("{}: {}", status, body)));
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BridgeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP POST failed: {} - {}", status, body);
            return Err(BridgeError::ApiError(format!("{}: {}", status, body)));
        }

        let body = response.json().await?;
        Ok(body)
    }
}
