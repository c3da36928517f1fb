//! TOML settings of the `ide-config` tool.
//!
//! These settings describe *where* overrides come from, not the UI
//! configuration itself: the storage file, the storage namespace, the
//! query-string prefix and the log level.  They live in the
//! platform-appropriate config directory:
//!
//! - Windows:  `%APPDATA%\IdeConfig\settings.toml`
//! - Linux:    `~/.config/ide-config/settings.toml`
//! - macOS:    `~/Library/Application Support/IdeConfig/settings.toml`
//!
//! ```toml
//! log_level = "debug"
//!
//! [storage]
//! file = "/var/lib/ide/storage.json"
//! namespace = "ide-config:"
//!
//! [query]
//! prefix = "config."
//! ```
//!
//! Every field has a serde default, so a missing file or a file with only
//! some fields still yields complete settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::persisted::DEFAULT_NAMESPACE;
use crate::application::resolve_config::DEFAULT_QUERY_PREFIX;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub query: QuerySettings,
}

/// Where persisted overrides are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// JSON storage file.  Defaults to `storage.json` next to the settings
    /// file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Prefix applied to every persisted key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

/// How overrides are read from the query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuerySettings {
    /// Prefix a parameter must carry to override a key-path.
    #[serde(default = "default_query_prefix")]
    pub prefix: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
fn default_query_prefix() -> String {
    DEFAULT_QUERY_PREFIX.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageSettings::default(),
            query: QuerySettings::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            file: None,
            namespace: default_namespace(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            prefix: default_query_prefix(),
        }
    }
}

impl Settings {
    /// The storage file to use: the configured one, else `storage.json`
    /// beside `settings_file` (the platform settings file when `None`), else
    /// `None` (in-memory storage).
    pub fn storage_file(&self, settings_file: Option<&Path>) -> Option<PathBuf> {
        if let Some(file) = &self.storage.file {
            return Some(file.clone());
        }
        let settings_file = match settings_file {
            Some(path) => path.to_path_buf(),
            None => settings_file_path().ok()?,
        };
        let dir = settings_file.parent().unwrap_or_else(|| Path::new(""));
        Some(dir.join("storage.json"))
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn settings_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(settings_dir()?.join("settings.toml"))
}

/// Loads settings from `path`, or from [`settings_file_path`] when `path` is
/// `None`.  A missing file yields `Settings::default()`.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => settings_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(SettingsError::Io { path, source: e }),
    }
}

/// Writes `settings` to `path`, or to [`settings_file_path`] when `path` is
/// `None`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings(settings: &Settings, path: Option<&Path>) -> Result<(), SettingsError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => settings_file_path()?,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(&path, content).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the tool's
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("IdeConfig"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("ide-config"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("IdeConfig")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
