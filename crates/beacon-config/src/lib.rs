//! Beacon configuration system.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BeaconConfig, Transport};

use std::path::Path;

use beacon_common::ConfigError;

/// Load and validate the configuration.
///
/// With `path` set, that file is read and must exist. Otherwise
/// `config.toml` is loaded from the OS config directory, and a
/// commented default is created there if none exists.
pub fn load_config(path: Option<&Path>) -> Result<BeaconConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)?
        }
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_file_not_found() {
        let err = load_config(Some(Path::new("/tmp/nonexistent_beacon_config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn explicit_path_with_invalid_values_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timing]\npoll_interval_ms = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn explicit_path_with_partial_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\ntransport = \"stub\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.connection.transport, Transport::Stub);
        assert_eq!(config.timing.poll_interval_ms, 16);
    }
}
