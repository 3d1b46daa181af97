//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CADASTRO_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `CADASTRO_HOST` - Bind address (default: 127.0.0.1)
//! - `CADASTRO_PORT` - Listen port (default: 3000)
//! - `VIACEP_BASE_URL` - ViaCEP endpoint (default: <https://viacep.com.br/ws>)
//! - `VIACEP_TIMEOUT_SECS` - ViaCEP request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry trace sample rate (default: 0.1)

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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// ViaCEP postal code lookup configuration
    pub viacep: ViaCepConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// ViaCEP API configuration.
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Base URL of the ViaCEP web service
    pub base_url: String,
    /// Timeout applied to every lookup request
    pub timeout: Duration,
}

impl ServerConfig {
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

        let database_url = get_database_url("CADASTRO_DATABASE_URL")?;
        let host = get_env_or_default("CADASTRO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CADASTRO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CADASTRO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CADASTRO_PORT".to_string(), e.to_string()))?;

        let viacep = ViaCepConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            viacep,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ViaCepConfig {
    /// Public ViaCEP endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://viacep.com.br/ws";

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("VIACEP_BASE_URL", Self::DEFAULT_BASE_URL);
        let timeout_secs = get_env_or_default("VIACEP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VIACEP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., CADASTRO_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
