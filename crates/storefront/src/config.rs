//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ALLOWED_ORIGIN` - CORS origin for browser clients
//!   (default: permissive)
//! - `DATABASE_MAX_CONNECTIONS` - Pool upper bound (default: 10)
//! - `DATABASE_MIN_CONNECTIONS` - Pool lower bound (default: 2)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)
//! - `DATABASE_IDLE_TIMEOUT_SECS` - Idle connection reap (default: 600)
//! - `GEOCODER_API_KEY` - Geocoding provider key; the geocode endpoint is
//!   disabled when absent
//! - `GEOCODER_BASE_URL` - Provider autocomplete endpoint
//! - `GEOCODER_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Tracing sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Browser origin allowed by CORS; permissive when unset
    pub allowed_origin: Option<String>,
    /// Database connection pool bounds
    pub pool: PoolConfig,
    /// Geocoding provider configuration; `None` disables the proxy endpoint
    pub geocoder: Option<GeocoderConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Database connection pool bounds.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    /// Maximum pool size
    pub max_connections: u32,
    /// Connections kept warm
    pub min_connections: u32,
    /// How long acquire() waits before `PoolTimedOut`
    pub acquire_timeout_secs: u64,
    /// Idle connection reap interval
    pub idle_timeout_secs: u64,
}

/// Geocoding provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Provider autocomplete endpoint
    pub base_url: String,
    /// Provider API key (server-side only)
    pub api_key: SecretString,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let allowed_origin = get_optional_env("STOREFRONT_ALLOWED_ORIGIN");

        let pool = PoolConfig::from_env()?;
        let geocoder = GeocoderConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_env_or_default("SENTRY_SAMPLE_RATE", 1.0_f32)?;
        let sentry_traces_sample_rate = parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?;

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origin,
            pool,
            geocoder,
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

impl PoolConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: parse_env_or_default("DATABASE_MIN_CONNECTIONS", 2)?,
            acquire_timeout_secs: parse_env_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?,
            idle_timeout_secs: parse_env_or_default("DATABASE_IDLE_TIMEOUT_SECS", 600)?,
        })
    }
}

impl GeocoderConfig {
    /// Default provider endpoint (LocationIQ autocomplete).
    pub const DEFAULT_BASE_URL: &'static str = "https://api.locationiq.com/v1/autocomplete";

    /// Load the geocoder block; absent `GEOCODER_API_KEY` disables it.
    ///
    /// The base URL is parse-validated at startup so a typo fails the boot
    /// rather than every request.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("GEOCODER_API_KEY") else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "GEOCODER_API_KEY")?;

        let base_url = get_env_or_default("GEOCODER_BASE_URL", Self::DEFAULT_BASE_URL);
        validate_base_url(&base_url)?;

        Ok(Some(Self {
            base_url,
            api_key: SecretString::from(api_key),
            timeout_secs: parse_env_or_default("GEOCODER_TIMEOUT_SECS", 10)?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., STOREFRONT_DATABASE_URL)
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

/// Parse an environment variable into `T`, using `default` when unset.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Require an absolute http(s) URL with a host.
fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("GEOCODER_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "GEOCODER_BASE_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            allowed_origin: None,
            pool: PoolConfig {
                max_connections: 10,
                min_connections: 2,
                acquire_timeout_secs: 10,
                idle_timeout_secs: 600,
            },
            geocoder: None,
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
    fn test_validate_base_url_accepts_https() {
        assert!(validate_base_url(GeocoderConfig::DEFAULT_BASE_URL).is_ok());
        assert!(validate_base_url("http://localhost:8080/autocomplete").is_ok());
    }

    #[test]
    fn test_validate_base_url_rejects_garbage() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://example.com/autocomplete").is_err());
        assert!(validate_base_url("/v1/autocomplete").is_err());
    }

    #[test]
    fn test_geocoder_config_debug_redacts_api_key() {
        let config = GeocoderConfig {
            base_url: GeocoderConfig::DEFAULT_BASE_URL.to_string(),
            api_key: SecretString::from("pk.live.d41d8cd98f00b204"),
            timeout_secs: 10,
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("locationiq.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("pk.live.d41d8cd98f00b204"));
    }
}
