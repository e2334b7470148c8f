//! Stop flag shared between the signal task and the sync loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-way running flag. Starts running; once stopped it stays stopped.
///
/// Clones share the same flag, so the signal side and the loop side each
/// hold their own handle.
#[derive(Debug, Clone)]
pub struct SignalLatch {
    running: Arc<AtomicBool>,
}

impl SignalLatch {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request a stop. Never blocks and never allocates.
    ///
    /// Returns `true` only for the call that actually flipped the flag.
    pub fn request_stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for SignalLatch {
    fn default() -> Self {
        Self::new()
    }
}
