use std::io;

use thiserror::Error;

/// Result type used across the TimeScope core crate.
pub type Result<T> = std::result::Result<T, TimescopeError>;

/// Canonical error representation shared by all TimeScope crates.
#[derive(Debug, Error)]
pub enum TimescopeError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("key discovery failed: {0}")]
    DiscoveryError(String),

    #[error("index error: {0}")]
    IndexError(String),

    #[error("event source error: {0}")]
    SourceError(String),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

impl From<serde_json::Error> for TimescopeError {
    fn from(err: serde_json::Error) -> Self {
        TimescopeError::DeserializationError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {key}: {reason}")]
    InvalidEnvVar { key: String, reason: String },
}

impl From<ConfigError> for TimescopeError {
    fn from(value: ConfigError) -> Self {
        TimescopeError::ConfigError(value.to_string())
    }
}
