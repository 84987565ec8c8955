//! Configuration loader

use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AdapterConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!("Loading adapter settings from {} ({})", path.display(), ext);

        let config = match ext {
            "json" => Self::from_json(&content)?,
            "toml" => Self::from_toml(&content)?,
            _ => return Err(Error::Config(format!("Unknown config format: {}", ext))),
        };
        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<AdapterConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<AdapterConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Reject settings the adapter cannot run with
    pub fn validate(config: &AdapterConfig) -> Result<()> {
        if config.directive_prefix.is_empty() {
            return Err(Error::Config("directive_prefix must not be empty".to_string()));
        }
        if config.directive_count == 0 {
            return Err(Error::Config("directive_count must be at least 1".to_string()));
        }
        if config.output_key.is_empty() {
            return Err(Error::Config("output_key must not be empty".to_string()));
        }
        Ok(())
    }
}
