//! Service configuration loaded once at process start

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::errors::BridgeError;
use crate::logs::LogLevel;

/// Platform API key
pub const ENV_API_KEY: &str = "GATEKEEPER_API_KEY";

/// Webhook signing secret issued by the platform
pub const ENV_WEBHOOK_SECRET: &str = "GATEKEEPER_WEBHOOK_SECRET";

/// Platform API base URL
pub const ENV_PLATFORM_URL: &str = "GATEKEEPER_PLATFORM_URL";

/// Replay tolerance window in seconds
pub const ENV_TOLERANCE_SECS: &str = "GATEKEEPER_TOLERANCE_SECS";

/// Host to bind the webhook server to
pub const ENV_HOST: &str = "GATEKEEPER_HOST";

/// Port the webhook server listens on
pub const ENV_PORT: &str = "GATEKEEPER_PORT";

/// Log level
pub const ENV_LOG_LEVEL: &str = "GATEKEEPER_LOG_LEVEL";

const DEFAULT_PLATFORM_URL: &str = "https://api.platform.example.com/v1";
const DEFAULT_TOLERANCE_SECS: u64 = 300;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Main service configuration
#[derive(Debug)]
pub struct Config {
    /// API key for outbound platform calls
    pub api_key: SecretString,

    /// Signing secret for inbound webhook verification
    pub webhook_secret: SecretString,

    /// Base URL of the platform API
    pub platform_base_url: String,

    /// Tolerance window for webhook timestamps
    pub tolerance: Duration,

    /// Server configuration
    pub server: ServerOptions,

    /// Log level
    pub log_level: LogLevel,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// A missing API key or webhook secret is fatal; everything else has a
    /// default.
    pub fn from_env() -> Result<Self, BridgeError> {
        let api_key = SecretString::from(require_env(ENV_API_KEY)?);
        let webhook_secret = SecretString::from(require_env(ENV_WEBHOOK_SECRET)?);

        let platform_base_url =
            std::env::var(ENV_PLATFORM_URL).unwrap_or_else(|_| DEFAULT_PLATFORM_URL.to_string());
        Url::parse(&platform_base_url)
            .map_err(|e| BridgeError::ConfigError(format!("invalid {}: {}", ENV_PLATFORM_URL, e)))?;

        let tolerance = Duration::from_secs(parse_env(ENV_TOLERANCE_SECS, DEFAULT_TOLERANCE_SECS)?);

        let server = ServerOptions {
            host: std::env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_env(ENV_PORT, DEFAULT_PORT)?,
        };

        let log_level = match std::env::var(ENV_LOG_LEVEL) {
            Ok(value) => value.parse().map_err(BridgeError::ConfigError)?,
            Err(_) => LogLevel::default(),
        };

        Ok(Self {
            api_key,
            webhook_secret,
            platform_base_url,
            tolerance,
            server,
            log_level,
        })
    }
}

/// Webhook server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn require_env(name: &str) -> Result<String, BridgeError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(BridgeError::ConfigError(format!("{} is not set", name))),
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, BridgeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| BridgeError::ConfigError(format!("invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
