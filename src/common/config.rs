//! Configuration file handling

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Headers sent with every request, overriding scenario headers
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Variables available to every scenario before the first step
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

/// HTTP transport settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Timeout applied to each request
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent when the scenario does not set one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept self-signed or otherwise invalid certificates
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("api-scenario/{}", env!("CARGO_PKG_VERSION"))
}

/// Serialization format of the result file
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    #[serde(alias = "yml")]
    Yaml,
}

impl OutputFormat {
    /// Parse a user supplied format name. Anything that is not YAML is JSON.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "YAML" | "YML" => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

/// Output settings
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Default format of the result file
    #[serde(default)]
    pub format: OutputFormat,

    /// Colorize console narration
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}
