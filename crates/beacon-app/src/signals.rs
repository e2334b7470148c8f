//! Termination signals to latch translation.

use std::io;

use beacon_presence::SignalLatch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Install the SIGINT/SIGTERM listeners and spawn the task that trips
/// `latch` on every receipt.
///
/// Handlers are registered before this returns, so a signal that arrives
/// right after startup is not lost.
pub fn install(latch: SignalLatch) -> io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            #[cfg(unix)]
            let name = tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => "SIGINT",
                    Err(e) => {
                        warn!("Failed to listen for Ctrl+C: {e}");
                        return;
                    }
                },
                Some(()) = terminate.recv() => "SIGTERM",
            };

            #[cfg(not(unix))]
            let name = match tokio::signal::ctrl_c().await {
                Ok(()) => "Ctrl+C",
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {e}");
                    return;
                }
            };

            if latch.request_stop() {
                info!(signal = name, "Received {name}, shutting down gracefully");
            } else {
                debug!(signal = name, "shutdown already requested");
            }
        }
    }))
}
