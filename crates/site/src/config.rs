//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Project URL of the hosted backend (database, storage, auth)
//! - `SUPABASE_ANON_KEY` - Public API key sent with every backend request
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL of the site (default: `http://localhost:3000`)
//! - `PAGE_CACHE_TTL_SECS` - Lifetime of cached public pages (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Hosted backend connection
    pub supabase: SupabaseConfig,
    /// How long rendered public page data stays cached
    pub page_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Hosted backend connection settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub url: Url,
    /// API key sent as `apikey` and as the bearer token for anonymous calls
    pub api_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
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
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(source: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(source);

        let host = env
            .or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("SITE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_PORT".to_string(), e.to_string()))?;
        let base_url = env.or_default("SITE_BASE_URL", "http://localhost:3000");
        let supabase = SupabaseConfig::from_source(source, "SUPABASE_ANON_KEY")?;
        let page_cache_ttl = env
            .or_default("PAGE_CACHE_TTL_SECS", "60")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PAGE_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            supabase,
            page_cache_ttl,
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

    /// Whether the site is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SupabaseConfig {
    /// Load the backend URL plus the API key stored under `key_var`.
    ///
    /// The site uses the public anon key. Operator tooling passes the
    /// service-role key variable instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either value is missing or the URL is invalid.
    pub fn from_env(key_var: &str) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_source(&|key: &str| std::env::var(key).ok(), key_var)
    }

    fn from_source(
        source: &dyn Fn(&str) -> Option<String>,
        key_var: &str,
    ) -> Result<Self, ConfigError> {
        let env = Env(source);
        let raw_url = env.required("SUPABASE_URL")?;
        let url = Url::parse(raw_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;
        let api_key = SecretString::from(env.required(key_var)?);
        Ok(Self { url, api_key })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with the usual required/optional/default helpers.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable. Blank values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SiteConfig::from_source(&move |key: &str| map.get(key).cloned())
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(&[
            ("SUPABASE_URL", "https://abcd.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon-key"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.supabase.url.as_str(), "https://abcd.supabase.co/");
        assert_eq!(config.supabase.api_key.expose_secret(), "anon-key");
        assert_eq!(config.page_cache_ttl, Duration::from_secs(60));
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_url_is_fatal() {
        let err = load(&[("SUPABASE_ANON_KEY", "anon-key")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SUPABASE_URL"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let err = load(&[
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "  "),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[
            ("SUPABASE_URL", "not a url"),
            ("SUPABASE_ANON_KEY", "anon-key"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SUPABASE_URL"));

        let err = load(&[
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon-key"),
            ("SITE_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SITE_PORT"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = load(&[
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "super-sensitive-key"),
            ("SITE_BASE_URL", "https://premiumfood.ng"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-sensitive-key"));
        assert!(debug.contains("[REDACTED]"));
        assert!(config.is_secure());
    }
}
