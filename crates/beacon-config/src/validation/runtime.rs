//! Validation for application, connection, timing, and logging.

use crate::schema::{BeaconConfig, LOG_LEVELS};

use super::helpers::validate_range;

pub(crate) fn validate_application(errors: &mut Vec<String>, config: &BeaconConfig) {
    if config.application.id == 0 {
        errors.push("application.id must be non-zero".into());
    }
}

pub(crate) fn validate_connection(errors: &mut Vec<String>, config: &BeaconConfig) {
    validate_range(
        errors,
        "connection.handshake_timeout",
        config.connection.handshake_timeout,
        1,
        60,
    );
}

pub(crate) fn validate_timing(errors: &mut Vec<String>, config: &BeaconConfig) {
    validate_range(
        errors,
        "timing.poll_interval_ms",
        config.timing.poll_interval_ms,
        1,
        1000,
    );
}

pub(crate) fn validate_logging(errors: &mut Vec<String>, config: &BeaconConfig) {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}
