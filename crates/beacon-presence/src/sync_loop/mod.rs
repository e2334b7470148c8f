//! The presence synchronization loop.
//!
//! One task drives everything: it creates the connection, publishes the
//! initial record, then repeatedly drains callbacks, re-publishes every
//! [`REFRESH_INTERVAL`], and sleeps for the poll interval, until the
//! [`SignalLatch`] trips. The connection is closed exactly once, after
//! the last drain, and the release is awaited before `run` returns.

mod settings;
mod stats;


pub use settings::{
    LoopExit, LoopSettings, DEFAULT_ACTIVE_STATE, DEFAULT_POLL_INTERVAL, REFRESH_INTERVAL,
};
pub use stats::{StatsSnapshot, SyncStats};

use std::sync::Arc;

use beacon_common::{ErrorCode, SubmitResult};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::connection::{Connector, PresenceConnection};
use crate::latch::SignalLatch;
use crate::record::{PresenceRecord, RecordError};

/// Current wall-clock time, epoch seconds.
fn epoch_now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub struct PresenceSyncLoop<C: Connector> {
    connector: C,
    record: PresenceRecord,
    settings: LoopSettings,
    latch: SignalLatch,
    stats: Arc<SyncStats>,
}

impl<C: Connector> PresenceSyncLoop<C> {
    pub fn new(
        connector: C,
        record: PresenceRecord,
        settings: LoopSettings,
        latch: SignalLatch,
    ) -> Self {
        Self {
            connector,
            record,
            settings,
            latch,
            stats: Arc::new(SyncStats::default()),
        }
    }

    /// Handle to the submission counters, readable while the loop runs.
    pub fn stats(&self) -> Arc<SyncStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the latch trips.
    ///
    /// Returns [`LoopExit::StartupFailed`] without submitting anything if
    /// the connection cannot be created.
    pub async fn run(self) -> LoopExit {
        let Self {
            connector,
            mut record,
            settings,
            latch,
            stats,
        } = self;

        info!(
            application_id = settings.application_id,
            "Initializing presence connection"
        );
        let mut connection = match connector
            .create(settings.application_id, settings.create_flags)
            .await
        {
            Ok(connection) => connection,
            Err(code) => {
                error!(code = code.code(), "Failed to initialize presence connection: {code}");
                return LoopExit::StartupFailed(code);
            }
        };
        info!("Presence connection established");

        record.restart_at(epoch_now());
        submit(&mut connection, &record, &stats);
        info!("Rich presence activated");

        let mut last_tick = Instant::now();
        let result = loop {
            connection.drain_events();

            let now = Instant::now();
            if now.duration_since(last_tick) >= REFRESH_INTERVAL {
                if let Err(e) = refresh(&mut record, &settings.active_state) {
                    break Err(e);
                }
                submit(&mut connection, &record, &stats);
                last_tick = now;
            }

            tokio::time::sleep(settings.poll_interval).await;

            if !latch.is_running() {
                break Ok(());
            }
        };

        info!("Closing presence connection");
        connection.close();
        connection.finish().await;

        match result {
            Ok(()) => {
                let snapshot = stats.snapshot();
                info!(
                    submitted = snapshot.submitted,
                    acknowledged = snapshot.acknowledged,
                    failed = snapshot.failed,
                    "Presence shutdown complete"
                );
                LoopExit::Clean
            }
            Err(e) => {
                error!(error = %e, "Presence loop aborted");
                LoopExit::Fault(e.to_string())
            }
        }
    }
}

/// Periodic tick: mark the record active and restart its clock.
fn refresh(record: &mut PresenceRecord, active_state: &str) -> Result<(), RecordError> {
    record.set_state(active_state)?;
    record.restart_at(epoch_now());
    Ok(())
}

/// How a submission's result is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateOutcome {
    Acknowledged,
    Failed(ErrorCode),
    /// A newer update was issued before this result arrived; it says
    /// nothing about what the platform currently shows.
    Superseded(SubmitResult),
}

impl UpdateOutcome {
    fn of(seq: u64, latest: u64, result: SubmitResult) -> Self {
        match result {
            _ if seq < latest => UpdateOutcome::Superseded(result),
            Ok(()) => UpdateOutcome::Acknowledged,
            Err(code) => UpdateOutcome::Failed(code),
        }
    }
}

/// Fire-and-forget submission tagged with the next sequence number.
///
/// The callback only logs and counts; it never touches the record or the
/// loop's control state.
fn submit<P: PresenceConnection>(connection: &mut P, record: &PresenceRecord, stats: &Arc<SyncStats>) {
    let seq = stats.next_seq();
    let stats = Arc::clone(stats);
    debug!(seq, state = record.state(), "submitting activity update");

    connection.submit_presence_update(
        record,
        Box::new(move |result| {
            let latest = stats.latest_seq();
            match UpdateOutcome::of(seq, latest, result) {
                UpdateOutcome::Acknowledged => {
                    stats.record_ack();
                    info!(seq, "Activity updated successfully");
                }
                UpdateOutcome::Failed(code) => {
                    stats.record_failure();
                    warn!(seq, code = code.code(), "Failed to update activity: {code}");
                }
                UpdateOutcome::Superseded(result) => {
                    match result {
                        Ok(()) => stats.record_ack(),
                        Err(_) => stats.record_failure(),
                    }
                    stats.record_stale();
                    info!(seq, latest, ?result, "Result for superseded activity update #{seq}");
                }
            }
        }),
    );
}
