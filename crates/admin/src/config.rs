//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin dashboard
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_SESSION_MAX_AGE_HOURS` - Login lifetime before re-authentication (default: 24)
//! - `ADMIN_UPLOAD_MAX_BYTES` - Largest accepted image (default: 5 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Object storage
//! - `STORAGE_BACKEND` - `local` (default) or `remote`
//! - `ADMIN_UPLOAD_DIR` - Local upload root (default: `uploads`)
//! - `ADMIN_UPLOAD_PUBLIC_URL` - Public prefix for local uploads (default: `{ADMIN_BASE_URL}/uploads`)
//! - `STORAGE_URL` - Remote object storage endpoint (required when remote)
//! - `STORAGE_SERVICE_KEY` - Remote object storage service key (required when remote)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Largest accepted upload unless overridden: 5 MiB.
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Default login lifetime.
pub const DEFAULT_SESSION_MAX_AGE_HOURS: i64 = 24;

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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin dashboard
    pub base_url: String,
    /// Hours a login stays valid, measured from `login_time`
    pub session_max_age_hours: i64,
    /// Largest accepted upload in bytes
    pub upload_max_bytes: usize,
    /// Where uploaded images are stored
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Object storage backend.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub enum StorageConfig {
    /// Files on local disk, served by the admin binary under `/uploads`.
    Local {
        /// Root directory; each bucket is a subdirectory.
        dir: PathBuf,
        /// Public URL prefix the bucket/key path is appended to.
        public_url: String,
    },
    /// An HTTP object store accepting `PUT /object/{bucket}/{key}`.
    Remote {
        /// Storage endpoint, e.g. `https://project.example.co/storage/v1`.
        endpoint: Url,
        /// Bearer key with write access to the buckets.
        service_key: SecretString,
    },
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { dir, public_url } => f
                .debug_struct("Local")
                .field("dir", dir)
                .field("public_url", public_url)
                .finish(),
            Self::Remote { endpoint, .. } => f
                .debug_struct("Remote")
                .field("endpoint", &endpoint.as_str())
                .field("service_key", &"[REDACTED]")
                .finish(),
        }
    }
}

impl StorageConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        match get_env_or_default("STORAGE_BACKEND", "local").as_str() {
            "local" => Ok(Self::Local {
                dir: PathBuf::from(get_env_or_default("ADMIN_UPLOAD_DIR", "uploads")),
                public_url: get_optional_env("ADMIN_UPLOAD_PUBLIC_URL").unwrap_or_else(|| {
                    format!("{}/uploads", base_url.trim_end_matches('/'))
                }),
            }),
            "remote" => {
                let endpoint = get_required_env("STORAGE_URL")?;
                let endpoint = Url::parse(&endpoint).map_err(|e| {
                    ConfigError::InvalidEnvVar("STORAGE_URL".to_string(), e.to_string())
                })?;
                Ok(Self::Remote {
                    endpoint,
                    service_key: get_validated_secret("STORAGE_SERVICE_KEY")?,
                })
            }
            other => Err(ConfigError::InvalidEnvVar(
                "STORAGE_BACKEND".to_string(),
                format!("expected 'local' or 'remote', got '{other}'"),
            )),
        }
    }
}

impl AdminConfig {
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

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;

        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let base_url = get_required_env("ADMIN_BASE_URL")?;

        let session_max_age_hours = parse_positive(
            "ADMIN_SESSION_MAX_AGE_HOURS",
            DEFAULT_SESSION_MAX_AGE_HOURS,
        )?;

        let upload_max_bytes = parse_positive("ADMIN_UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?;

        let storage = StorageConfig::from_env(&base_url)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_max_age_hours,
            upload_max_bytes,
            storage,
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

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional numeric variable that must be greater than zero.
fn parse_positive<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let value = raw
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if value <= T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
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

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

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

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn local_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/garuda"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_max_age_hours: DEFAULT_SESSION_MAX_AGE_HOURS,
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            storage: StorageConfig::Local {
                dir: PathBuf::from("uploads"),
                public_url: "http://localhost:3001/uploads".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-service-key", "STORAGE_SERVICE_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_upload_limit_is_five_mebibytes() {
        assert_eq!(DEFAULT_UPLOAD_MAX_BYTES, 5_242_880);
    }

    #[test]
    fn test_socket_addr() {
        let config = local_config();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert!(!config.is_https());
    }

    #[test]
    fn test_remote_storage_debug_redacts_key() {
        let storage = StorageConfig::Remote {
            endpoint: Url::parse("https://storage.example.net/storage/v1").unwrap(),
            service_key: SecretString::from("sk_live_0123456789abcdef"),
        };

        let debug_output = format!("{storage:?}");

        assert!(debug_output.contains("storage.example.net"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_0123456789abcdef"));
    }
}
