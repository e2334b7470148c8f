use serde::{Deserialize, Serialize};

/// Loop timing. The 30 second refresh cadence is fixed and not part of
/// the config; only the polling granularity is tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep between loop iterations, in milliseconds.
    pub poll_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
        }
    }
}
