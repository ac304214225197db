//! Configuration System
//!
//! Layered settings for extraction runs: built-in defaults, the user config
//! file, an explicit `--config` file, then `VPK_EXTRACT_*` environment
//! variables. Command-line flags are applied on top by the binary.

use crate::error::ExtractError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Extraction defaults
    #[serde(default)]
    pub extract: ExtractSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the `extract` command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractSettings {
    /// Milliseconds to pause after each written file
    #[serde(default)]
    pub delay_ms: u64,

    /// Patterns used when none are given on the command line
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl ExtractSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.logging.validate()?;
        for pattern in &self.extract.patterns {
            if pattern.is_empty() {
                return Err(ExtractError::ConfigError(
                    "extract.patterns must not contain empty patterns".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load from the default sources, optionally adding an explicit file
    pub fn load(explicit: Option<&Path>) -> Result<Self, ExtractError> {
        let config = match explicit {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        config.validate()?;
        Ok(config)
    }
}
