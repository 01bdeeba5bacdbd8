//! Process configuration, read once from the environment at startup.
//!
//! Business logic never touches the environment: the binary builds a
//! [`DatabaseConfig`] and hands it to the executor factory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{ConfigError, DEFAULT_CONNECT_TIMEOUT_SECS};

pub const ENV_SECRET_FILE: &str = "DATABASE_SECRET_FILE";
pub const ENV_RESOURCE_URL: &str = "DATABASE_RESOURCE_URL";
pub const ENV_DATABASE_NAME: &str = "DATABASE_NAME";
pub const ENV_TABLE_NAME: &str = "TABLE_NAME";
pub const ENV_SCHEMA_NAME: &str = "SCHEMA_NAME";
pub const ENV_CONNECT_TIMEOUT: &str = "PROVISION_CONNECT_TIMEOUT_SECS";

/// Username/password pair resolved from the credential secret.
#[derive(Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseCredentials {
    /// Load a JSON secret of the form `{"username": "..", "password": ".."}`.
    /// Extra keys (engine, host, port, ...) are ignored.
    pub fn from_secret_file(path: &Path) -> Result<Self, ConfigError> {
        let secret_error =
            |reason: String| ConfigError::Secret { path: path.to_path_buf(), reason };
        let raw = std::fs::read_to_string(path).map_err(|e| secret_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| secret_error(e.to_string()))
    }
}

/// Connection identifiers plus the unused table/schema defaults.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub secret_file: PathBuf,
    pub credentials: DatabaseCredentials,
    /// `postgres://host[:port]` of the target cluster, without credentials.
    pub resource_url: String,
    pub database_name: String,
    pub default_table_name: Option<String>,
    pub default_schema_name: Option<String>,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or(ConfigError::Missing(key))
        };
        let secret_file = PathBuf::from(required(ENV_SECRET_FILE)?);
        let resource_url = required(ENV_RESOURCE_URL)?;
        let database_name = required(ENV_DATABASE_NAME)?;

        if !(resource_url.starts_with("postgres://") || resource_url.starts_with("postgresql://")) {
            return Err(ConfigError::InvalidResource(resource_url));
        }

        let credentials = DatabaseCredentials::from_secret_file(&secret_file)?;
        let timeout_secs = parse_with_default(
            ENV_CONNECT_TIMEOUT,
            lookup(ENV_CONNECT_TIMEOUT),
            DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        // A zero timeout would expire before the first connect attempt.
        let timeout_secs = if timeout_secs == 0 {
            tracing::warn!(
                var = ENV_CONNECT_TIMEOUT,
                default = DEFAULT_CONNECT_TIMEOUT_SECS,
                "connect timeout must be positive, using default"
            );
            DEFAULT_CONNECT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        Ok(Self {
            secret_file,
            credentials,
            resource_url,
            database_name,
            default_table_name: lookup(ENV_TABLE_NAME),
            default_schema_name: lookup(ENV_SCHEMA_NAME),
            connect_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse an optional variable value with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}
