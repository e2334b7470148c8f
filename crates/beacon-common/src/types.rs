use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte limit for `details`, `state` and the active-state text.
pub const MAX_TEXT_LEN: usize = 128;
/// Byte limit for large/small image keys.
pub const MAX_IMAGE_KEY_LEN: usize = 128;
/// Byte limit for large/small image hover texts.
pub const MAX_ASSET_TEXT_LEN: usize = 256;

/// Text written to `state` on every periodic refresh.
pub const DEFAULT_ACTIVE_STATE: &str = "Active since startup";

/// Category of the published activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Playing => "playing",
            ActivityKind::Streaming => "streaming",
            ActivityKind::Listening => "listening",
            ActivityKind::Watching => "watching",
            ActivityKind::Custom => "custom",
            ActivityKind::Competing => "competing",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_playing() {
        assert_eq!(ActivityKind::default(), ActivityKind::Playing);
    }

    #[test]
    fn deserializes_lowercase() {
        let kind: ActivityKind = serde_json::from_str("\"watching\"").unwrap();
        assert_eq!(kind, ActivityKind::Watching);
        assert!(serde_json::from_str::<ActivityKind>("\"Watching\"").is_err());
    }

    #[test]
    fn display_matches_serde_name() {
        for kind in [ActivityKind::Listening, ActivityKind::Competing] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
