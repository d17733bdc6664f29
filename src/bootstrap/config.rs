//! Configuration loading.
//!
//! Reads the TOML file and hands it to [`TrackerConfig::from_toml`]; all
//! defaulting lives there.

use std::path::Path;

use anyhow::Context;
use rc_core::TrackerConfig;
use tracing::debug;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or names
/// an unusable storage backend.
pub fn load_config(config_path: &Path) -> anyhow::Result<TrackerConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    TrackerConfig::from_toml(&toml_value)
}

/// Load `explicit` if given; otherwise the default config file if it exists,
/// or built-in defaults.
pub fn load_config_or_default(
    explicit: Option<&Path>,
    default_path: &Path,
) -> anyhow::Result<TrackerConfig> {
    match explicit {
        Some(path) => load_config(path),
        None if default_path.exists() => load_config(default_path),
        None => {
            debug!(path = %default_path.display(), "no config file, using defaults");
            Ok(TrackerConfig::default())
        }
    }
}
