//! Configuration paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/api-scenario/`
//! - macOS: `~/Library/Application Support/api-scenario/`
//! - Windows: `%APPDATA%\api-scenario\`

use std::path::PathBuf;

/// Name used for the application directories
const APP_NAME: &str = "api-scenario";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
