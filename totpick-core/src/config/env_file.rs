//! `KEY=VALUE` configuration file I/O
//!
//! Locates the per-user configuration directory and reads the optional
//! `config` file inside it without touching the process environment.

use crate::config::{Config, Overrides, Settings};
use crate::error::ConfigError;
use crate::types::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config";

/// Directory name below the XDG config home
const APP_DIR_NAME: &str = "totpick";

/// Get the configuration directory
///
/// Returns `$TOTPICK_CONFIG_DIR` if set, else `$XDG_CONFIG_HOME/totpick`,
/// else `~/.config/totpick`.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    config_dir_from(|key| std::env::var(key).ok())
}

fn config_dir_from<E>(environment: E) -> Result<PathBuf, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(dir) = environment(env::CONFIG_DIR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    if let Some(xdg) = environment("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR_NAME));
    }

    let home = environment("HOME")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::NoConfigDir {
            message: "HOME environment variable not set".to_string(),
        })?;

    Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
}

/// Get the configuration file path inside a config directory
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir(config_dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::IoError {
        message: format!(
            "Failed to create config directory {}: {}",
            config_dir.display(),
            e
        ),
    })
}

/// Read settings from a `KEY=VALUE` file
///
/// A missing file yields empty settings. Keys the tool does not know about
/// are ignored with a warning.
pub fn load_settings_from_path<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let mut settings = Settings::new();

    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(settings);
    }

    let load_failed = |message: String| ConfigError::LoadFailed {
        path: path.to_string_lossy().to_string(),
        message,
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| load_failed(e.to_string()))?;
    for item in iter {
        let (key, value) = item.map_err(|e| load_failed(e.to_string()))?;
        if env::CONFIG_KEYS.contains(&key.as_str()) {
            settings.insert(key, value);
        } else {
            warn!("Ignoring unknown config key {} in {}", key, path.display());
        }
    }

    debug!("Loaded {} setting(s) from {}", settings.len(), path.display());
    Ok(settings)
}

/// Load the configuration the way the CLI does
///
/// Creates the config directory if needed, reads the config file and
/// resolves it against the process environment and `overrides`.
pub fn load_config(overrides: &Overrides) -> Result<Config, ConfigError> {
    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let settings = load_settings_from_path(config_file_path(&config_dir))?;
    Config::resolve(config_dir, |key| std::env::var(key).ok(), &settings, overrides)
}
