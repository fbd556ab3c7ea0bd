//! Error types for api-scenario
//!
//! Only failures that stop the whole run (loading a scenario, reading the
//! configuration, writing the output file) travel as `Err`. Everything that
//! goes wrong while a scenario runs is recorded on the corresponding result
//! value instead.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for api-scenario
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario Loading Errors ===
    #[error("Impossible to locate the scenario file '{path}': {error}")]
    ScenarioRead { path: String, error: String },

    #[error("Impossible to parse the scenario file '{path}': {error}")]
    ScenarioParse { path: String, error: String },

    // === Step Dispatch Errors ===
    #[error("'{0}' is an invalid step_type")]
    UnsupportedStep(String),

    #[error("'{0}' is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("Impossible to parse URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // === Transport Errors ===
    #[error("HTTP request failed: {0}")]
    Transport(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Output Errors ===
    #[error("Failed to write output file '{path}': {error}")]
    OutputWrite { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a scenario read error
    pub fn scenario_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::ScenarioRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &std::path::Path, error: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
