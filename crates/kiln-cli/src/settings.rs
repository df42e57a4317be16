//! Render settings management
//!
//! Settings are the [`ShaderConfig`] constants baked into generated shaders.
//! They are read from `--config <file>` when given, otherwise from
//! `{config_dir}/kiln/settings.json`, and default when neither exists.

use anyhow::{Context, Result};
use kiln_sdf::ShaderConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Get the default settings file path
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kiln").join("settings.json"))
}

/// Parse and validate settings JSON. Missing fields take their defaults.
pub fn parse_settings(contents: &str) -> Result<ShaderConfig> {
    let config: ShaderConfig = serde_json::from_str(contents).context("Invalid settings JSON")?;
    config.validate()?;
    Ok(config)
}

/// Load settings from an explicit file, which must exist
pub fn load_settings_from(path: &Path) -> Result<ShaderConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    parse_settings(&contents).with_context(|| format!("In settings file {}", path.display()))
}

/// Load the effective settings
///
/// An explicit path is strict. The default location is optional, and a
/// broken file there is reported and ignored.
pub fn load_settings(explicit: Option<&Path>) -> Result<ShaderConfig> {
    if let Some(path) = explicit {
        return load_settings_from(path);
    }

    let Some(path) = settings_path() else {
        return Ok(ShaderConfig::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(ShaderConfig::default());
    }

    match load_settings_from(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Ignoring settings file");
            Ok(ShaderConfig::default())
        }
    }
}

/// Save settings to `path`, or to the default location
pub fn save_settings(config: &ShaderConfig, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => settings_path().context("Could not determine config directory")?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize settings")?;
    fs::write(&path, json).context("Failed to write settings file")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_under_kiln() {
        if let Some(path) = settings_path() {
            assert!(path.ends_with("kiln/settings.json"));
        }
    }

    #[test]
    fn test_parse_partial_settings() {
        let config = parse_settings(r#"{ "fog_density": 0.0, "supersample": 1 }"#).unwrap();
        assert_eq!(config.supersample, 1);
        assert_eq!(config.max_steps, ShaderConfig::default().max_steps);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert!(parse_settings(r#"{ "max_steps": 0 }"#).is_err());
        assert!(parse_settings("not json").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("kiln-settings-does-not-exist.json");
        assert!(load_settings(Some(&path)).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("kiln-settings-{}", std::process::id()))
            .join("settings.json");
        let config = ShaderConfig {
            max_steps: 128,
            gamma: 1.8,
            ..ShaderConfig::default()
        };

        let written = save_settings(&config, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(load_settings(Some(&path)).unwrap(), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
