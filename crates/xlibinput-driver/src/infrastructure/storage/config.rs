//! TOML configuration of the `xlibinput-driver` host binary.
//!
//! Default location: `$XDG_CONFIG_HOME/xlibinput/config.toml`, falling back
//! to `~/.config/xlibinput/config.toml`.  `--config PATH` overrides it.
//!
//! ```toml
//! [driver]
//! log_level = "info"   # tracing filter when RUST_LOG is unset
//! output = "text"      # "text": tracing records, "json": JSON lines on stdout
//!
//! [[devices]]
//! identifier = "touchpad"
//! device = "/dev/input/event3"
//! ```
//!
//! Every `[[devices]]` entry becomes one option list `{Identifier, Device}`
//! handed to pre-init, exactly as an `InputDevice` section of `xorg.conf`
//! would.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, so an empty file (or no file at
//! all) yields a working configuration with no devices.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::options::{InputOptions, DEVICE_OPTION, IDENTIFIER_OPTION};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub driver: DriverSettings,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

/// How posted events are reported.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `tracing` record per posted event.
    #[default]
    Text,
    /// One JSON object per line on stdout.
    Json,
}

/// General host settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub output: OutputFormat,
}

/// One configured input device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntry {
    /// Display name used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Device node path, e.g. `/dev/input/event3`.
    pub device: PathBuf,
}

impl DeviceEntry {
    /// The option list this entry hands to pre-init.
    pub fn to_options(&self) -> InputOptions {
        let mut options = InputOptions::new();
        if let Some(identifier) = &self.identifier {
            options.push(IDENTIFIER_OPTION, identifier.clone());
        }
        options.push(DEVICE_OPTION, self.device.display().to_string());
        options
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputFormat::default(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config at `path`, returning the default if the file does not
/// exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Loads the config from the default location.
pub fn load_config() -> Result<HostConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Writes `config` to `path`, creating the parent directory.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &HostConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("xlibinput"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
