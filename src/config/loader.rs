//! Config file loader and serialization.

use crate::config::DashboardConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the global settings path: ~/.config/async-dashboard/settings.json
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::ValidationFailed("Cannot determine home directory".to_string())
    })?;

    let config_dir = home.join(".config/async-dashboard");
    Ok(config_dir.join("settings.json"))
}

/// Load and validate config from a JSON file.
pub fn load_config_from_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config: DashboardConfig =
        serde_json::from_str(&content).map_err(ConfigError::InvalidJson)?;
    config.validate()?;

    Ok(config)
}

/// Load config, falling back to defaults when the file does not exist yet.
///
/// The defaults are written to `path` so there is a file to edit on the
/// next run. Failing to write them is logged, not returned. Malformed or
/// invalid files are still reported.
pub fn load_or_default(path: &Path) -> Result<DashboardConfig, ConfigError> {
    match load_config_from_file(path) {
        Ok(config) => {
            log::info!("[CONFIG] Loaded settings from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound(_)) => {
            let config = DashboardConfig::default();
            match save_config_to_file(&config, path) {
                Ok(()) => log::info!(
                    "[CONFIG] No settings found, wrote defaults to {}",
                    path.display()
                ),
                Err(e) => log::warn!(
                    "[CONFIG] No settings found, using defaults (could not write {}: {})",
                    path.display(),
                    e
                ),
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Save config to JSON file.
pub fn save_config_to_file(config: &DashboardConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }
    }

    let json_content = serde_json::to_string_pretty(config).map_err(ConfigError::InvalidJson)?;
    fs::write(path, json_content).map_err(ConfigError::IoError)?;

    Ok(())
}

/// Validate config path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => {}
        Some(ext) => {
            return Err(ConfigError::ValidationFailed(format!(
                "Configuration file must have .json extension, got .{}",
                ext.to_string_lossy()
            )))
        }
        None => {
            return Err(ConfigError::ValidationFailed(
                "Configuration file must have .json extension".to_string(),
            ))
        }
    }

    Ok(())
}
