//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VTEX_ACCOUNT` - VTEX account name (e.g., mystore)
//! - `VTEX_APP_KEY` - Masterdata app key
//! - `VTEX_APP_TOKEN` - Masterdata app token
//!
//! ## Optional
//! - `PRECHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `PRECHECKOUT_PORT` - Listen port (default: 3000)
//! - `VTEX_ENVIRONMENT` - Platform environment (default: vtexcommercestable)
//! - `PRECHECKOUT_DATA_ENTITY` - Customer data entity (default: CL)
//! - `PRECHECKOUT_UPSTREAM_TIMEOUT_MS` - Upstream request timeout (default: 10000)
//! - `PRECHECKOUT_UPSTREAM_RETRIES` - Upstream transport retries (default: 2)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Pre-checkout application configuration.
#[derive(Debug, Clone)]
pub struct PrecheckoutConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// VTEX platform configuration
    pub vtex: VtexConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// VTEX platform configuration.
///
/// Covers both the Masterdata document store and the public checkout API.
/// Timeout and retry counts are fixed at process start; there is no
/// per-request tuning.
///
/// Implements `Debug` manually to redact the app token.
#[derive(Clone)]
pub struct VtexConfig {
    /// Account name (e.g., mystore)
    pub account: String,
    /// Platform environment (e.g., vtexcommercestable)
    pub environment: String,
    /// Masterdata app key
    pub app_key: String,
    /// Masterdata app token (server-side only)
    pub app_token: SecretString,
    /// Data entity holding customer records (e.g., CL)
    pub data_entity: String,
    /// Fixed timeout applied to every upstream request
    pub upstream_timeout: Duration,
    /// Fixed transport-failure retry count for store calls
    pub upstream_retries: u32,
}

impl std::fmt::Debug for VtexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VtexConfig")
            .field("account", &self.account)
            .field("environment", &self.environment)
            .field("app_key", &self.app_key)
            .field("app_token", &"[REDACTED]")
            .field("data_entity", &self.data_entity)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("upstream_retries", &self.upstream_retries)
            .finish()
    }
}

impl PrecheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PRECHECKOUT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRECHECKOUT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("PRECHECKOUT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRECHECKOUT_PORT".to_string(), e.to_string())
            })?;

        let vtex = VtexConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            vtex,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VtexConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms = get_env_or_default("PRECHECKOUT_UPSTREAM_TIMEOUT_MS", "10000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "PRECHECKOUT_UPSTREAM_TIMEOUT_MS".to_string(),
                    e.to_string(),
                )
            })?;
        let upstream_retries = get_env_or_default("PRECHECKOUT_UPSTREAM_RETRIES", "2")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "PRECHECKOUT_UPSTREAM_RETRIES".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            account: get_required_env("VTEX_ACCOUNT")?,
            environment: get_env_or_default("VTEX_ENVIRONMENT", "vtexcommercestable"),
            app_key: get_required_env("VTEX_APP_KEY")?,
            app_token: get_required_secret("VTEX_APP_TOKEN")?,
            data_entity: get_env_or_default("PRECHECKOUT_DATA_ENTITY", "CL"),
            upstream_timeout: Duration::from_millis(timeout_ms),
            upstream_retries,
        })
    }

    /// Base URL of the account's platform host.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}.{}.com.br", self.account, self.environment)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
