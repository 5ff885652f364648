//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INTAKE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `INTAKE_HOST` - Bind address (default: 127.0.0.1)
//! - `INTAKE_PORT` - Listen port (default: 3000)
//! - `INTAKE_RESPONSE_FORMAT` - `json` or `text` (default: json)
//! - `INTAKE_EMPTY_PHONE_ID` - `reject` or `insert` (default: reject)
//! - `INTAKE_RECONCILE_MODE` - `atomic` or `read-then-write` (default: atomic)
//! - `INTAKE_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `INTAKE_LOG_FORMAT` - `json` or `text` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use intake_core::{EmptyKeyPolicy, ReconcileMode};

use crate::response::ResponseFormat;

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
pub struct IntakeConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// How responses are rendered
    pub response_format: ResponseFormat,
    /// Handling of customer submissions without `phone_id`
    pub empty_key_policy: EmptyKeyPolicy,
    /// How keyed customer submissions are reconciled
    pub reconcile_mode: ReconcileMode,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl IntakeConfig {
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

        let database_url = get_database_url("INTAKE_DATABASE_URL")?;
        let host = get_parsed_or_default("INTAKE_HOST", "127.0.0.1")?;
        let port = get_parsed_or_default("INTAKE_PORT", "3000")?;
        let db_max_connections: u32 = get_parsed_or_default("INTAKE_DB_MAX_CONNECTIONS", "10")?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "INTAKE_DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let response_format = get_parsed_or_default("INTAKE_RESPONSE_FORMAT", "json")?;
        let empty_key_policy = get_parsed_or_default("INTAKE_EMPTY_PHONE_ID", "reject")?;
        let reconcile_mode = get_parsed_or_default("INTAKE_RECONCILE_MODE", "atomic")?;
        let json_logs = get_env_or_default("INTAKE_LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            response_format,
            empty_key_policy,
            reconcile_mode,
            json_logs,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }

    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }

    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
