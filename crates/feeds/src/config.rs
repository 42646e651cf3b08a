//! Feeds service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (resolved per request, optionally suffixed by `?store=`)
//! - `SHOPIFY_URL[_<store>]` - Store base URL (e.g., <https://your-store.myshopify.com>)
//! - `SHOPIFY_ADMIN_API_ACCESS_TOKEN[_<store>]` - Admin API access token,
//!   falling back to the legacy `SHOPIFY_API_PASSWORD[_<store>]`
//!
//! ## Optional
//! - `FEEDS_HOST` - Bind address (default: 127.0.0.1)
//! - `FEEDS_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2023-10)
//! - `SHOPIFY_DISABLE_PUBLISHED_CHECK` - Skip the sales-channel published
//!   filter on the variants feed
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2023-10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Feeds application configuration.
///
/// Shopify credentials are deliberately absent here: the credential set
/// depends on the `store` query parameter, so they are resolved per request
/// via [`ShopifyCredentials::resolve`].
#[derive(Debug, Clone)]
pub struct FeedsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API version (e.g., 2023-10)
    pub api_version: String,
    /// Skip the published-to-sales-channel filter on the variants feed
    pub disable_published_check: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl FeedsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `FEEDS_HOST` or `FEEDS_PORT` are present but
    /// unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FEEDS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEEDS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FEEDS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEEDS_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            disable_published_check: get_bool_env("SHOPIFY_DISABLE_PUBLISHED_CHECK"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Shopify Admin API credentials for one store.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyCredentials {
    url: String,
    access_token: SecretString,
}

impl std::fmt::Debug for ShopifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyCredentials")
            .field("url", &self.url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyCredentials {
    #[must_use]
    pub fn new(url: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            url: url.into(),
            access_token,
        }
    }

    /// Resolve credentials from the environment for the given store suffix.
    ///
    /// With `store = Some("b2b")` the variables consulted are
    /// `SHOPIFY_URL_b2b` and `SHOPIFY_ADMIN_API_ACCESS_TOKEN_b2b` (then
    /// `SHOPIFY_API_PASSWORD_b2b`). This runs once per request, before any
    /// network call, because the suffix comes from the request itself.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the URL or both token
    /// variables are absent or empty.
    pub fn resolve(store: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve_from(|key| std::env::var(key).ok(), store)
    }

    /// Resolve credentials through an arbitrary key lookup.
    ///
    /// Empty values count as missing, matching how the variables behave when
    /// left blank in a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` naming the primary variable that
    /// could not be resolved.
    pub fn resolve_from<F>(lookup: F, store: Option<&str>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let suffix = store.map(|s| format!("_{s}")).unwrap_or_default();

        let url_key = format!("SHOPIFY_URL{suffix}");
        let url = lookup(&url_key)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar(url_key))?;

        let token_key = format!("SHOPIFY_ADMIN_API_ACCESS_TOKEN{suffix}");
        let token = lookup(&token_key)
            .filter(|v| !v.is_empty())
            .or_else(|| lookup(&format!("SHOPIFY_API_PASSWORD{suffix}")).filter(|v| !v.is_empty()))
            .ok_or(ConfigError::MissingEnvVar(token_key))?;

        Ok(Self::new(url, SecretString::from(token)))
    }

    /// The store base URL (no trailing API path).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The Admin API access token.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
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

/// Interpret an environment variable as a boolean flag (absent = false).
fn get_bool_env(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}
