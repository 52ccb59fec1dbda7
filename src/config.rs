//! Configuration management for prefixer
//!
//! Defaults are read from ~/.prefixer/config.toml (or $PREFIXER_CONFIG).
//! Command-line flags always win over the file.

use crate::error::PrefixerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "PREFIXER_CONFIG";

/// prefixer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for transformation flags
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Input separator used when -i is absent
    #[serde(default)]
    pub input_sep: Option<String>,

    /// Output separator used when -o is absent
    #[serde(default)]
    pub output_sep: Option<String>,

    #[serde(default)]
    pub trim: bool,

    #[serde(default)]
    pub skip_empty: bool,

    #[serde(default)]
    pub rm_ansi: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit debug logs on stderr
    #[serde(default)]
    pub debug: bool,
}

/// Get the configuration file path
///
/// Returns None when neither $PREFIXER_CONFIG nor a home directory is available.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".prefixer").join("config.toml"))
}

/// Load configuration from the default location
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_config() -> Result<Config, PrefixerError> {
    match config_file_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load configuration from a specific file
pub fn load_config_from(path: &Path) -> Result<Config, PrefixerError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path).map_err(|e| PrefixerError::Config {
        path: path.to_path_buf(),
        message: format!("failed to read: {}", e),
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| PrefixerError::Config {
        path: path.to_path_buf(),
        message: format!("failed to parse: {}", e),
    })?;

    validate_config(&config).map_err(|message| PrefixerError::Config {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(config)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.defaults.input_sep.as_deref() == Some("") {
        return Err("Invalid input_sep: must not be empty".to_string());
    }
    if config.defaults.output_sep.as_deref() == Some("") {
        return Err("Invalid output_sep: must not be empty".to_string());
    }
    Ok(())
}
