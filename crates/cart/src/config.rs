//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for catalog access
//! - `ROCKETSHOES_API_URL` - Base URL of the catalog/stock API. Reading the
//!   persisted cart works without it; see [`CartConfig::require_api_url`].
//!
//! ## Optional
//! - `ROCKETSHOES_STORAGE_PATH` - File backing the cart store (default: rocketshoes-storage.json)
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart is stored under (default: @RocketShoes:cart)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Catalog record cache TTL, 0 disables (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Storage key the cart blob lives under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const API_URL_VAR: &str = "ROCKETSHOES_API_URL";
const DEFAULT_STORAGE_PATH: &str = "rocketshoes-storage.json";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the catalog/stock API
    pub api_url: Option<Url>,
    /// File backing the key-value store
    pub storage_path: PathBuf,
    /// Key the cart is stored under
    pub storage_key: String,
    /// TTL for cached catalog records (zero disables the cache)
    pub product_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let api_url = vars
            .optional(API_URL_VAR)
            .map(|raw| parse_api_url(&raw))
            .transpose()?;

        let storage_path =
            PathBuf::from(vars.or_default("ROCKETSHOES_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let storage_key = vars.or_default("ROCKETSHOES_STORAGE_KEY", DEFAULT_STORAGE_KEY);

        let ttl_secs = vars
            .or_default(
                "ROCKETSHOES_PRODUCT_CACHE_TTL_SECS",
                DEFAULT_PRODUCT_CACHE_TTL_SECS,
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "ROCKETSHOES_PRODUCT_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            api_url,
            storage_path,
            storage_key,
            product_cache_ttl: Duration::from_secs(ttl_secs),
            sentry_dsn: vars.optional("SENTRY_DSN"),
        })
    }

    /// The catalog API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `ROCKETSHOES_API_URL` was not set.
    pub fn require_api_url(&self) -> Result<&Url, ConfigError> {
        self.api_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(API_URL_VAR.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(API_URL_VAR.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            API_URL_VAR.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
