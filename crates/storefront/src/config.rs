//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FRESHCART_HOST` - Bind address (default: 127.0.0.1)
//! - `FRESHCART_PORT` - Listen port (default: 3000)
//! - `FRESHCART_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `COMMERCE_API_URL` - Base URL of the remote commerce API
//!   (default: <https://ecommerce.routemisr.com/api/v1>)
//! - `CHECKOUT_RETURN_URL` - URL the hosted payment session returns the
//!   browser to (default: the storefront base URL)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.0)
//!
//! There are no secrets here: the commerce API authenticates each user
//! with a per-session token issued at sign-in, not with an API key.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Remote commerce API configuration
    pub commerce: CommerceApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Remote commerce API configuration.
#[derive(Debug, Clone)]
pub struct CommerceApiConfig {
    /// Base URL of the commerce API, without a trailing slash
    pub base_url: String,
    /// URL the hosted payment session redirects back to after payment
    pub checkout_return_url: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FRESHCART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FRESHCART_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FRESHCART_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FRESHCART_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("FRESHCART_BASE_URL", "http://localhost:3000");
        validate_url("FRESHCART_BASE_URL", &base_url)?;

        let commerce = CommerceApiConfig::from_env(&base_url)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            commerce,
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

impl CommerceApiConfig {
    fn from_env(storefront_base_url: &str) -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("COMMERCE_API_URL", "https://ecommerce.routemisr.com/api/v1");
        validate_url("COMMERCE_API_URL", &base_url)?;

        let checkout_return_url =
            get_env_or_default("CHECKOUT_RETURN_URL", storefront_base_url);
        validate_url("CHECKOUT_RETURN_URL", &checkout_return_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            checkout_return_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a value parses as an absolute URL.
fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("TEST", "not a url").is_err());
        assert!(validate_url("TEST", "https://example.com").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            commerce: CommerceApiConfig {
                base_url: "https://ecommerce.routemisr.com/api/v1".to_string(),
                checkout_return_url: "http://localhost:3000".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = CommerceApiConfig {
            base_url: "https://api.example.com/v1/".trim_end_matches('/').to_string(),
            checkout_return_url: "https://example.com".to_string(),
        };
        assert_eq!(config.base_url, "https://api.example.com/v1");
    }
}
