use std::{path::Path, time::Duration};

use parse_display::Display;
use serde::{Deserialize, Serialize};

use crate::{Budget, Tag};

/// Data-loading settings, read from a JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay before the stub records fetch resolves.
    pub records_delay_ms: u64,
    /// Reject fetches that carry no credential.
    pub require_credential: bool,
    pub tags: Vec<Tag>,
    pub budgets: Vec<Budget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_delay_ms: 2000,
            require_credential: true,
            tags: Vec::new(),
            budgets: Vec::new(),
        }
    }
}

impl Config {
    pub fn records_delay(&self) -> Duration {
        Duration::from_millis(self.records_delay_ms)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|source| ConfigError::Parse { source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, source);
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Self::from_json_str(&content).inspect_err(|e| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, e);
        })
    }
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[display("invalid config: {source}")]
    Parse { source: serde_json::Error },
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source } => Some(source),
        }
    }
}
