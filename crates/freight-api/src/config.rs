//! API Configuration

use serde::{Deserialize, Serialize};

use freight_messaging::Actor;

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub bind_addr: String,
    /// Identity Provider snapshot: actors known to the platform.
    /// Production deployments sync this from the platform gateway.
    #[serde(default)]
    pub actors: Vec<Actor>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            actors: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
