//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `USERHUB_DATABASE_URL` - MongoDB connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `USERHUB_HOST` - Bind address (default: 127.0.0.1)
//! - `USERHUB_PORT` - Listen port (default: 3000)
//! - `USERHUB_DATABASE_NAME` - Database name (default: userhub)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default bind address.
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port.
const DEFAULT_PORT: &str = "3000";
/// Default database name.
const DEFAULT_DATABASE_NAME: &str = "userhub";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// MongoDB connection string (may contain credentials)
    pub database_url: SecretString,
    /// Database holding the users collection
    pub database_name: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl AppConfig {
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

        let database_url = get_database_url("USERHUB_DATABASE_URL")?;
        let database_name = get_env_or_default("USERHUB_DATABASE_NAME", DEFAULT_DATABASE_NAME);
        let host = get_env_or_default("USERHUB_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("USERHUB_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("USERHUB_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("USERHUB_PORT".to_owned(), e.to_string()))?;

        Ok(Self {
            database_url,
            database_name,
            host,
            port,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
