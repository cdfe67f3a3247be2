//! Server configuration.

use std::path::Path;

use loanwatch_portfolio::EngineConfig;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::data_file`].
pub const DATA_ENV_VAR: &str = "LOANWATCH_DATA";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Snapshot table file (csv, tsv, txt or json)
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Filter engine tuning
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_data_file() -> String {
    "data/portfolio.csv".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Replaces the snapshot file.
    #[must_use]
    pub fn with_data_file(mut self, data_file: impl Into<String>) -> Self {
        self.data_file = data_file.into();
        self
    }

    /// Applies `LOANWATCH_DATA` if it is set and non-empty.
    #[must_use]
    pub fn apply_env_overrides(self) -> Self {
        match std::env::var(DATA_ENV_VAR) {
            Ok(data_file) if !data_file.trim().is_empty() => self.with_data_file(data_file),
            _ => self,
        }
    }
}
