//! Core TOML config loading: read from path or platform default.

use crate::schema::TetherConfig;
use crate::validation;
use std::io::ErrorKind;
use std::path::Path;
use tether_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their defaults. A config that parses but fails
/// validation is returned as-is with a warning; callers wanting a hard
/// failure run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<TetherConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config: TetherConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "config validation warning");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/tether/config.toml`
/// On Linux: `~/.config/tether/config.toml`
///
/// If the file does not exist, writes a documented default and returns defaults.
pub fn load_default() -> Result<TetherConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(TetherConfig::default())
        }
        other => other,
    }
}
