//! Reading `config.toml`, and seeding it with the commented template on
//! first run.

use crate::schema::BeaconConfig;
use beacon_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "beacon";
const FILE_NAME: &str = "config.toml";

fn io_error(action: &str, path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("failed to {action} {}: {err}", path.display()))
}

/// Parse a config file. Absent sections and fields take their defaults;
/// range checks happen later in [`crate::validation::validate`].
pub fn load_from_path(path: &Path) -> Result<BeaconConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    let config = toml::from_str::<BeaconConfig>(&content)
        .map_err(|e| ConfigError::ParseError(format!("invalid TOML in {}: {e}", path.display())))?;

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// `<os config dir>/beacon/config.toml`, e.g. `~/.config/beacon/config.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no OS config directory available".into()))
}

/// Load from [`default_config_path`], creating the template there first
/// if nothing exists yet.
pub fn load_default() -> Result<BeaconConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}

pub(super) fn load_or_create(path: &Path) -> Result<BeaconConfig, ConfigError> {
    if path.exists() {
        return load_from_path(path);
    }
    create_default_config(path)?;
    Ok(BeaconConfig::default())
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("write", path, e))?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}
