//! Loop settings and exit status.

use std::process::ExitCode;
use std::time::Duration;

use beacon_common::ErrorCode;
pub use beacon_common::DEFAULT_ACTIVE_STATE;

/// Fixed cadence of periodic re-submissions.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default sleep between loop iterations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub application_id: u64,
    pub create_flags: u64,
    pub poll_interval: Duration,
    pub active_state: String,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            application_id: 0,
            create_flags: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            active_state: DEFAULT_ACTIVE_STATE.to_string(),
        }
    }
}

/// How [`PresenceSyncLoop::run`](super::PresenceSyncLoop::run) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// Stopped on request after closing the connection.
    Clean,
    /// The connection could not be created; the loop never started.
    StartupFailed(ErrorCode),
    /// The loop body hit an internal error.
    Fault(String),
}

impl LoopExit {
    /// Process exit status: 0 for a clean stop, 1 otherwise.
    pub fn code(&self) -> u8 {
        match self {
            LoopExit::Clean => 0,
            LoopExit::StartupFailed(_) | LoopExit::Fault(_) => 1,
        }
    }
}

impl From<LoopExit> for ExitCode {
    fn from(exit: LoopExit) -> Self {
        ExitCode::from(exit.code())
    }
}
