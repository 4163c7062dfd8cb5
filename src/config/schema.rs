//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Graph building configuration
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Graph building configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Pool pods into one node per controller
    #[serde(default = "default_true")]
    pub group_pods: bool,

    /// First path segment of generated node links
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Serialization format of the printed graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_link_prefix() -> String {
    "overview".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            group_pods: default_true(),
            link_prefix: default_link_prefix(),
        }
    }
}
