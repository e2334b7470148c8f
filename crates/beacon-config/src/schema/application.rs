//! Platform application identity.

use serde::{Deserialize, Serialize};

/// Application id registered with the presence platform.
pub const DEFAULT_APPLICATION_ID: u64 = 1381335767607152740;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub id: u64,
    /// Create flags forwarded verbatim to the connection.
    pub flags: u64,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_APPLICATION_ID,
            flags: 0,
        }
    }
}
