use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning an invocation event into provisioning DDL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProvisionError {
    /// A required event field or `table_Schema` key is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid embedding dimension {0}: must be between 1 and {max} for an HNSW index", max = crate::HNSW_MAX_DIMENSION)]
    InvalidDimension(i64),

    /// The payload is not a JSON object of the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Errors raised while loading process configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    /// The credential secret could not be read or parsed.
    #[error("cannot load database secret {}: {reason}", path.display())]
    Secret { path: PathBuf, reason: String },

    #[error("invalid database resource url: {0}")]
    InvalidResource(String),
}
