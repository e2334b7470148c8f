//! Full configuration validation.
//!
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod presence;
mod runtime;


use crate::schema::BeaconConfig;
use beacon_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BeaconConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    runtime::validate_application(&mut errors, config);
    runtime::validate_connection(&mut errors, config);
    runtime::validate_timing(&mut errors, config);
    runtime::validate_logging(&mut errors, config);
    presence::validate_presence(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
