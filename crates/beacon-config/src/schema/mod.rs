//! Configuration schema types for Beacon.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod application;
mod connection;
mod logging;
mod presence;
mod timing;

pub use application::*;
pub use connection::*;
pub use logging::*;
pub use presence::*;
pub use timing::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Beacon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub application: ApplicationConfig,
    pub connection: ConnectionConfig,
    pub presence: PresenceConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}
