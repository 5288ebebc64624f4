use std::env;

use crate::errors::ConfigError;

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Default number of events emitted per batch by the file sources.
pub const DEFAULT_BATCH_CHUNK_SIZE: usize = 2048;

/// Global configuration shared across the TimeScope crates.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub environment: Environment,
    pub node_name: String,
    /// Endpoint of a live event stream (WebSocket or SSE), if any.
    pub stream_url: Option<String>,
    /// How many events file sources hand to the index per callback.
    pub batch_chunk_size: usize,
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(|suffix| env::var(format!("TIMESCOPE_{suffix}")))
    }

    /// Loads configuration from env vars with a custom prefix (e.g. `DASH_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(|suffix| env::var(format!("{prefix}{suffix}")))
    }

    fn load<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let environment = var("ENV")
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        let node_name = var("NODE_NAME").unwrap_or_else(|_| "timescope-node".to_string());
        let stream_url = var("STREAM_URL").ok().filter(|url| !url.trim().is_empty());

        let batch_chunk_size = match var("BATCH_CHUNK_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    key: "BATCH_CHUNK_SIZE".into(),
                    reason: format!("expected a positive integer, got {raw:?}"),
                })?,
            Err(_) => DEFAULT_BATCH_CHUNK_SIZE,
        };

        Ok(Self {
            environment,
            node_name,
            stream_url,
            batch_chunk_size,
        })
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            node_name: "timescope-node".to_string(),
            stream_url: None,
            batch_chunk_size: DEFAULT_BATCH_CHUNK_SIZE,
        }
    }
}
