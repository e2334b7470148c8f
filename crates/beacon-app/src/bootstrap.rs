//! Turning a loaded [`BeaconConfig`] into loop inputs.

use std::time::Duration;

use beacon_config::schema::{ConnectionConfig, PresenceConfig};
use beacon_config::BeaconConfig;
use beacon_presence::{Assets, IpcConnector, LoopSettings, PresenceRecord, RecordError};

/// The record published at startup. `start` is reset again when the
/// connection comes up. A configured `end` that has already passed is
/// dropped.
pub fn initial_record(config: &PresenceConfig, now: i64) -> Result<PresenceRecord, RecordError> {
    let end = config.end.filter(|end| *end >= now);
    if end.is_none() && config.end.is_some() {
        tracing::warn!(end = ?config.end, now, "Configured activity end has passed, ignoring it");
    }

    PresenceRecord::builder()
        .details(config.details.as_str())
        .state(config.state.as_str())
        .kind(config.category)
        .end(end)
        .assets(Assets {
            large_image: config.large_image.clone(),
            large_text: config.large_text.clone(),
            small_image: config.small_image.clone(),
            small_text: config.small_text.clone(),
        })
        .build(now)
}

pub fn loop_settings(config: &BeaconConfig) -> LoopSettings {
    LoopSettings {
        application_id: config.application.id,
        create_flags: config.application.flags,
        poll_interval: Duration::from_millis(u64::from(config.timing.poll_interval_ms)),
        active_state: config.presence.active_state.clone(),
    }
}

pub fn ipc_connector(config: &ConnectionConfig) -> IpcConnector {
    IpcConnector::new()
        .with_handshake_timeout(Duration::from_secs(u64::from(config.handshake_timeout)))
}

/// Filter directive for the log subscriber: the CLI override wins over
/// the config file.
pub fn log_directive(cli_override: Option<&str>, config: &BeaconConfig) -> String {
    match cli_override {
        Some(directive) => directive.to_string(),
        None => config.logging.level.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_common::ActivityKind;

    #[test]
    fn default_config_builds_record() {
        let config = BeaconConfig::default();
        let record = initial_record(&config.presence, 1_700_000_000).unwrap();

        assert_eq!(record.details(), "Artifact Virtual Assistant");
        assert_eq!(record.state(), "Managing Discord Community");
        assert_eq!(record.kind(), ActivityKind::Playing);
        assert_eq!(record.timestamps().start(), 1_700_000_000);
        assert_eq!(record.timestamps().end(), None);
        assert_eq!(record.assets().large_image, "artifact_logo");
        assert_eq!(record.assets().small_text, "Online and Ready");
    }

    #[test]
    fn passed_end_is_dropped() {
        let mut config = BeaconConfig::default();
        config.presence.end = Some(1_000);

        let record = initial_record(&config.presence, 2_000).unwrap();
        assert_eq!(record.timestamps().end(), None);
    }

    #[test]
    fn future_end_is_kept() {
        let mut config = BeaconConfig::default();
        config.presence.end = Some(3_000);

        let record = initial_record(&config.presence, 2_000).unwrap();
        assert_eq!(record.timestamps().end(), Some(3_000));
    }

    #[test]
    fn oversized_text_rejected() {
        let mut config = BeaconConfig::default();
        config.presence.details = "d".repeat(129);

        let err = initial_record(&config.presence, 0).unwrap_err();
        assert!(matches!(err, RecordError::TooLong { field: "details", .. }));
    }

    #[test]
    fn settings_follow_config() {
        let mut config = BeaconConfig::default();
        config.application.id = 42;
        config.application.flags = 1;
        config.timing.poll_interval_ms = 50;
        config.presence.active_state = "Online".into();

        let settings = loop_settings(&config);
        assert_eq!(settings.application_id, 42);
        assert_eq!(settings.create_flags, 1);
        assert_eq!(settings.poll_interval, Duration::from_millis(50));
        assert_eq!(settings.active_state, "Online");
    }

    #[test]
    fn default_settings_match_loop_defaults() {
        let settings = loop_settings(&BeaconConfig::default());
        let defaults = LoopSettings::default();
        assert_eq!(settings.poll_interval, defaults.poll_interval);
        assert_eq!(settings.active_state, defaults.active_state);
    }

    #[test]
    fn connector_uses_configured_handshake_timeout() {
        let mut config = BeaconConfig::default();
        config.connection.handshake_timeout = 3;
        assert_eq!(ipc_connector(&config.connection).handshake_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn cli_log_level_overrides_config() {
        let mut config = BeaconConfig::default();
        config.logging.level = "WARN".into();

        assert_eq!(log_directive(None, &config), "warn");
        assert_eq!(log_directive(Some("beacon_presence=trace"), &config), "beacon_presence=trace");
    }
}
