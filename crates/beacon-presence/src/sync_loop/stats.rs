//! Counters shared between the loop and its submission callbacks.

use std::sync::atomic::{AtomicU64, Ordering};

/// Submission outcome counters.
///
/// The submitted count doubles as the sequence number of the most recent
/// submission, which lets a callback tell whether a newer update has been
/// issued since its own.
#[derive(Debug, Default)]
pub struct SyncStats {
    submitted: AtomicU64,
    acknowledged: AtomicU64,
    failed: AtomicU64,
    stale: AtomicU64,
}

/// Point-in-time copy of [`SyncStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub acknowledged: u64,
    pub failed: u64,
    pub stale: u64,
}

impl SyncStats {
    /// Record a new submission and return its sequence number (1-based).
    pub(crate) fn next_seq(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn latest_seq(&self) -> u64 {
        self.submitted.load(Ordering::Acquire)
    }

    pub(crate) fn record_ack(&self) {
        self.acknowledged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Acquire),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        let stats = SyncStats::default();
        assert_eq!(stats.latest_seq(), 0);
        assert_eq!(stats.next_seq(), 1);
        assert_eq!(stats.next_seq(), 2);
        assert_eq!(stats.latest_seq(), 2);
    }

    #[test]
    fn snapshot_reflects_counters() {
        let stats = SyncStats::default();
        stats.next_seq();
        stats.record_ack();
        stats.record_failure();
        stats.record_stale();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                submitted: 1,
                acknowledged: 1,
                failed: 1,
                stale: 1,
            }
        );
    }
}
