//! Orderdesk configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (unless `ORDERS_FIXTURE_PATH` is set)
//! - `FIRESTORE_PROJECT_ID` - Google Cloud project holding the Firestore database
//!
//! ## Optional
//! - `ORDERDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDERDESK_PORT` - Listen port (default: 3001)
//! - `ORDERS_COLLECTION` - Collection to read (default: orders)
//! - `ORDERS_PAGE_SIZE` - Rows per page (default: 2, `0` shows every row on one page)
//! - `ORDERS_FIXTURE_PATH` - Serve orders from a JSON fixture instead of Firestore
//! - `FIRESTORE_DATABASE` - Database ID (default: `(default)`)
//! - `FIRESTORE_EMULATOR_HOST` - `host:port` of a Firestore emulator (plain HTTP)
//! - `FIRESTORE_ACCESS_TOKEN` - OAuth bearer token
//! - `FIRESTORE_API_KEY` - Web API key
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::view::PageSize;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_COLLECTION: &str = "orders";
const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_PAGE_SIZE: &str = "2";

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

/// Orderdesk application configuration.
#[derive(Debug, Clone)]
pub struct OrderdeskConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Orders view configuration
    pub orders: OrdersConfig,
    /// Where orders are read from
    pub store: StoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Orders view configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersConfig {
    /// Collection holding one document per order
    pub collection: String,
    /// Rows shown per page
    pub page_size: PageSize,
}

/// Backing document store selection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Cloud Firestore (or its emulator) over the REST API.
    Firestore(FirestoreConfig),
    /// A JSON file in the Firestore list-documents format, served from memory.
    Fixture(PathBuf),
}

/// Firestore REST API configuration.
///
/// Implements `Debug` manually to redact credentials.
#[derive(Clone)]
pub struct FirestoreConfig {
    /// Google Cloud project ID
    pub project_id: String,
    /// Database ID, usually `(default)`
    pub database: String,
    /// Emulator `host:port`; switches the client to plain HTTP without auth
    pub emulator_host: Option<String>,
    /// OAuth bearer token
    pub access_token: Option<SecretString>,
    /// Web API key, sent as the `key` query parameter
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("emulator_host", &self.emulator_host)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FirestoreConfig {
    /// Create a configuration for the given project with default database.
    #[must_use]
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            emulator_host: None,
            access_token: None,
            api_key: None,
        }
    }

    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let project_id = get_required_env(env, "FIRESTORE_PROJECT_ID")?;
        let database = get_env_or_default(env, "FIRESTORE_DATABASE", DEFAULT_DATABASE);
        let emulator_host = get_optional_env(env, "FIRESTORE_EMULATOR_HOST");

        Ok(Self {
            project_id,
            database,
            emulator_host,
            access_token: get_checked_secret(env, "FIRESTORE_ACCESS_TOKEN"),
            api_key: get_checked_secret(env, "FIRESTORE_API_KEY"),
        })
    }
}

impl OrdersConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let collection = get_env_or_default(env, "ORDERS_COLLECTION", DEFAULT_COLLECTION);
        if collection.is_empty() || collection.contains('/') {
            return Err(ConfigError::InvalidEnvVar(
                "ORDERS_COLLECTION".to_string(),
                "must be a non-empty top-level collection name".to_string(),
            ));
        }

        let page_size = get_env_or_default(env, "ORDERS_PAGE_SIZE", DEFAULT_PAGE_SIZE)
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ORDERS_PAGE_SIZE".to_string(), e.to_string())
            })?;

        Ok(Self {
            collection,
            page_size: PageSize::from_config(page_size),
        })
    }
}

impl OrderdeskConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&env, "ORDERDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERDESK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&env, "ORDERDESK_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERDESK_PORT".to_string(), e.to_string()))?;

        let orders = OrdersConfig::from_lookup(&env)?;
        let store = match get_optional_env(&env, "ORDERS_FIXTURE_PATH") {
            Some(path) => StoreConfig::Fixture(PathBuf::from(path)),
            None => StoreConfig::Firestore(FirestoreConfig::from_lookup(&env)?),
        };

        let sentry_dsn = get_optional_env(&env, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&env, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(&env, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(&env, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            orders,
            store,
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

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    get_optional_env(env, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Load an optional secret, warning when it looks like a placeholder.
fn get_checked_secret(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<SecretString> {
    get_optional_env(env, key).map(|value| {
        if let Err(e) = validate_secret_strength(&value, key) {
            tracing::warn!("{key} validation warning: {e}");
        }
        SecretString::from(value)
    })
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroUsize;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_firestore_project() {
        let config = OrderdeskConfig::from_lookup(lookup(&[("FIRESTORE_PROJECT_ID", "shop-prod")]))
            .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.orders.collection, "orders");
        assert_eq!(
            config.orders.page_size,
            PageSize::Fixed(NonZeroUsize::new(2).unwrap())
        );
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);

        let StoreConfig::Firestore(firestore) = config.store else {
            panic!("expected firestore store");
        };
        assert_eq!(firestore.project_id, "shop-prod");
        assert_eq!(firestore.database, "(default)");
        assert!(firestore.emulator_host.is_none());
        assert!(firestore.access_token.is_none());
    }

    #[test]
    fn test_missing_project_id() {
        let err = OrderdeskConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar(ref key) if key == "FIRESTORE_PROJECT_ID"
        ));
    }

    #[test]
    fn test_fixture_path_skips_firestore() {
        let config = OrderdeskConfig::from_lookup(lookup(&[
            ("ORDERS_FIXTURE_PATH", "fixtures/orders.json"),
            ("ORDERS_PAGE_SIZE", "0"),
            ("ORDERDESK_PORT", "8080"),
        ]))
        .unwrap();

        assert!(matches!(
            config.store,
            StoreConfig::Fixture(ref p) if p == &PathBuf::from("fixtures/orders.json")
        ));
        assert_eq!(config.orders.page_size, PageSize::All);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_page_size() {
        let err = OrderdeskConfig::from_lookup(lookup(&[
            ("ORDERS_FIXTURE_PATH", "orders.json"),
            ("ORDERS_PAGE_SIZE", "two"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ORDERS_PAGE_SIZE"));
    }

    #[test]
    fn test_nested_collection_rejected() {
        let err = OrderdeskConfig::from_lookup(lookup(&[
            ("ORDERS_FIXTURE_PATH", "orders.json"),
            ("ORDERS_COLLECTION", "shops/a/orders"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(ref key, _) if key == "ORDERS_COLLECTION"
        ));
    }

    #[test]
    fn test_invalid_host() {
        let err = OrderdeskConfig::from_lookup(lookup(&[
            ("ORDERS_FIXTURE_PATH", "orders.json"),
            ("ORDERDESK_HOST", "not-an-ip"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ORDERDESK_HOST"));
    }

    #[test]
    fn test_firestore_credentials_loaded() {
        let config = OrderdeskConfig::from_lookup(lookup(&[
            ("FIRESTORE_PROJECT_ID", "shop-dev"),
            ("FIRESTORE_EMULATOR_HOST", "localhost:8080"),
            ("FIRESTORE_API_KEY", "AIzaSyB7q9XkLm2PqR4tUv6WxYz8AbCdEfGh"),
        ]))
        .unwrap();

        let StoreConfig::Firestore(firestore) = config.store else {
            panic!("expected firestore store");
        };
        assert_eq!(firestore.emulator_host.as_deref(), Some("localhost:8080"));
        assert_eq!(
            firestore.api_key.unwrap().expose_secret(),
            "AIzaSyB7q9XkLm2PqR4tUv6WxYz8AbCdEfGh"
        );
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
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_firestore_config_debug_redacts_secrets() {
        let config = FirestoreConfig {
            access_token: Some(SecretString::from("ya29.super-secret-token".to_string())),
            api_key: Some(SecretString::from("AIza-super-secret-key".to_string())),
            ..FirestoreConfig::new("shop-prod")
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("shop-prod"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret"));
    }
}
