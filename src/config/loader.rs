//! Configuration loading
//!
//! Precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Config file (explicit path, or the root config path)
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the caller.

use std::path::Path;

use anyhow::{Context, Result};

use super::{paths, schema::Config};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration
    ///
    /// An explicit path must exist. The default root config is optional.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let root = paths::root_config_path();
                if root.exists() {
                    Self::load_file(&root)?
                } else {
                    tracing::debug!("No config file at {}, using defaults", root.display());
                    Config::default()
                }
            }
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from YAML. An empty document yields the defaults.
    pub fn parse(contents: &str) -> Result<Config> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // RESOURCE_VIEWER_GROUP_PODS override
        if let Ok(group_pods) = std::env::var("RESOURCE_VIEWER_GROUP_PODS") {
            match group_pods.parse::<bool>() {
                Ok(val) => config.viewer.group_pods = val,
                Err(_) => tracing::warn!(
                    "Ignoring RESOURCE_VIEWER_GROUP_PODS={}: expected true or false",
                    group_pods
                ),
            }
        }

        // RESOURCE_VIEWER_OUTPUT override
        if let Ok(format) = std::env::var("RESOURCE_VIEWER_OUTPUT") {
            match format.parse() {
                Ok(val) => config.output.format = val,
                Err(err) => tracing::warn!("Ignoring RESOURCE_VIEWER_OUTPUT: {}", err),
            }
        }

        config
    }
}
