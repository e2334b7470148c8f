//! Published activity configuration.

use beacon_common::{ActivityKind, DEFAULT_ACTIVE_STATE};
use serde::{Deserialize, Serialize};

/// Content of the activity record published at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub details: String,
    pub state: String,
    pub active_state: String,
    pub category: ActivityKind,
    /// Optional end of the activity, epoch seconds.
    pub end: Option<i64>,
    pub large_image: String,
    pub large_text: String,
    pub small_image: String,
    pub small_text: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            details: "Artifact Virtual Assistant".into(),
            state: "Managing Discord Community".into(),
            active_state: DEFAULT_ACTIVE_STATE.into(),
            category: ActivityKind::Playing,
            end: None,
            large_image: "artifact_logo".into(),
            large_text: "Artifact Virtual System".into(),
            small_image: "online_status".into(),
            small_text: "Online and Ready".into(),
        }
    }
}
