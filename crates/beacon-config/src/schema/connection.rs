//! Connection transport configuration.

use serde::{Deserialize, Serialize};

/// Which connection adapter the binary uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Local presence daemon, reached through the Discord SDK.
    #[default]
    Ipc,
    /// In-process stub that acknowledges every update.
    Stub,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub transport: Transport,
    /// Seconds to wait for the daemon handshake.
    pub handshake_timeout: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Ipc,
            handshake_timeout: 10,
        }
    }
}
