//! In-process connection that needs no running daemon.
//!
//! By default every submission is acknowledged with `Ok` on the next
//! drain. The connector can also be scripted (failed create, per-submission
//! results, delayed acknowledgements), and every call is recorded in a
//! shared [`StubJournal`], which makes it the deterministic stand-in for
//! the real platform in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use beacon_common::{ErrorCode, SubmitResult};
use tracing::debug;

use super::{Connector, PresenceConnection, ResultCallback};
use crate::record::PresenceRecord;

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Call log shared between a [`StubConnector`], its connections, and
/// whoever wants to inspect them.
///
/// Every recorded call takes the next value of a single operation counter,
/// so the relative order of drains and closes can be checked.
#[derive(Debug, Default)]
pub struct StubJournal {
    op_counter: AtomicU64,
    creates: AtomicUsize,
    drains: AtomicUsize,
    submissions: AtomicUsize,
    callbacks: AtomicUsize,
    closes: AtomicUsize,
    finishes: AtomicUsize,
    last_drain_op: AtomicU64,
    first_close_op: AtomicU64,
    last_record: Mutex<Option<PresenceRecord>>,
}

impl StubJournal {
    fn next_op(&self) -> u64 {
        self.op_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn drains(&self) -> usize {
        self.drains.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Callbacks delivered so far.
    pub fn callbacks(&self) -> usize {
        self.callbacks.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Times the release after close was awaited.
    pub fn finishes(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }

    /// `true` when a close happened and no drain followed it.
    pub fn closed_after_last_drain(&self) -> bool {
        let close = self.first_close_op.load(Ordering::SeqCst);
        close != 0 && close > self.last_drain_op.load(Ordering::SeqCst)
    }

    /// Copy of the most recently submitted record.
    pub fn last_record(&self) -> Option<PresenceRecord> {
        self.last_record
            .lock()
            .ok()
            .and_then(|record| record.clone())
    }
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Creates [`StubConnection`]s.
#[derive(Debug, Clone)]
pub struct StubConnector {
    journal: Arc<StubJournal>,
    create_error: Option<ErrorCode>,
    results: Vec<SubmitResult>,
    ack_delay: usize,
}

impl StubConnector {
    pub fn new() -> Self {
        Self {
            journal: Arc::new(StubJournal::default()),
            create_error: None,
            results: Vec::new(),
            ack_delay: 1,
        }
    }

    /// Make `create` fail with `code`.
    pub fn failing(mut self, code: ErrorCode) -> Self {
        self.create_error = Some(code);
        self
    }

    /// Results for the first submissions, in order. Later submissions
    /// succeed.
    pub fn with_results(mut self, results: impl IntoIterator<Item = SubmitResult>) -> Self {
        self.results = results.into_iter().collect();
        self
    }

    /// Number of drains a callback waits for. `1` (the default) means
    /// the next drain; `0` is treated as `1`.
    pub fn with_ack_delay(mut self, drains: usize) -> Self {
        self.ack_delay = drains.max(1);
        self
    }

    pub fn journal(&self) -> Arc<StubJournal> {
        Arc::clone(&self.journal)
    }
}

impl Default for StubConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for StubConnector {
    type Connection = StubConnection;

    async fn create(&self, application_id: u64, flags: u64) -> Result<StubConnection, ErrorCode> {
        self.journal.next_op();
        self.journal.creates.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = self.create_error {
            debug!(application_id, flags, %code, "stub create failing as scripted");
            return Err(code);
        }

        debug!(application_id, flags, "stub connection created");
        Ok(StubConnection {
            journal: Arc::clone(&self.journal),
            results: self.results.iter().copied().collect(),
            ack_delay: self.ack_delay,
            pending: VecDeque::new(),
            closed: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

struct PendingCallback {
    remaining: usize,
    result: SubmitResult,
    callback: ResultCallback,
}

/// Connection handed out by [`StubConnector`].
pub struct StubConnection {
    journal: Arc<StubJournal>,
    results: VecDeque<SubmitResult>,
    ack_delay: usize,
    pending: VecDeque<PendingCallback>,
    closed: bool,
}

impl StubConnection {
    /// Submissions whose callback has not fired yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl PresenceConnection for StubConnection {
    fn drain_events(&mut self) {
        let op = self.journal.next_op();
        self.journal.last_drain_op.store(op, Ordering::SeqCst);
        self.journal.drains.fetch_add(1, Ordering::SeqCst);

        for pending in self.pending.iter_mut() {
            pending.remaining = pending.remaining.saturating_sub(1);
        }

        // Every entry shares the same delay, so due entries are always at
        // the front.
        while self.pending.front().is_some_and(|p| p.remaining == 0) {
            if let Some(due) = self.pending.pop_front() {
                self.journal.callbacks.fetch_add(1, Ordering::SeqCst);
                (due.callback)(due.result);
            }
        }
    }

    fn submit_presence_update(&mut self, record: &PresenceRecord, on_result: ResultCallback) {
        self.journal.next_op();
        self.journal.submissions.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.journal.last_record.lock() {
            *last = Some(record.clone());
        }

        let result = if self.closed {
            Err(ErrorCode::NotRunning)
        } else {
            self.results.pop_front().unwrap_or(Ok(()))
        };

        self.pending.push_back(PendingCallback {
            remaining: self.ack_delay,
            result,
            callback: on_result,
        });
    }

    fn close(&mut self) {
        let op = self.journal.next_op();
        let _ = self
            .journal
            .first_close_op
            .compare_exchange(0, op, Ordering::SeqCst, Ordering::SeqCst);
        self.journal.closes.fetch_add(1, Ordering::SeqCst);

        if !self.closed {
            self.closed = true;
            debug!(pending = self.pending.len(), "stub connection closed");
        }
    }

    async fn finish(&mut self) {
        self.journal.next_op();
        self.journal.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<SubmitResult>>>, impl Fn() -> ResultCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let seen = Arc::clone(&seen);
            move || -> ResultCallback {
                let seen = Arc::clone(&seen);
                Box::new(move |result| seen.lock().unwrap().push(result))
            }
        };
        (seen, make)
    }

    #[tokio::test]
    async fn callback_waits_for_drain() {
        let connector = StubConnector::new();
        let mut conn = connector.create(1, 0).await.unwrap();
        let (seen, make) = recorder();

        conn.submit_presence_update(&PresenceRecord::default(), make());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(conn.pending(), 1);

        conn.drain_events();
        assert_eq!(*seen.lock().unwrap(), vec![Ok(())]);
        assert_eq!(conn.pending(), 0);
    }

    #[tokio::test]
    async fn scripted_results_apply_in_order() {
        let connector = StubConnector::new()
            .with_results([Err(ErrorCode::RateLimited), Ok(())]);
        let mut conn = connector.create(1, 0).await.unwrap();
        let (seen, make) = recorder();

        for _ in 0..3 {
            conn.submit_presence_update(&PresenceRecord::default(), make());
        }
        conn.drain_events();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Err(ErrorCode::RateLimited), Ok(()), Ok(())]
        );
    }

    #[tokio::test]
    async fn ack_delay_counts_drains() {
        let connector = StubConnector::new().with_ack_delay(3);
        let mut conn = connector.create(1, 0).await.unwrap();
        let (seen, make) = recorder();

        conn.submit_presence_update(&PresenceRecord::default(), make());
        conn.drain_events();
        conn.drain_events();
        assert!(seen.lock().unwrap().is_empty());

        conn.drain_events();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_connector_records_create() {
        let connector = StubConnector::new().failing(ErrorCode::ServiceUnavailable);
        let journal = connector.journal();

        let result = connector.create(1, 0).await;
        assert!(matches!(result, Err(ErrorCode::ServiceUnavailable)));
        assert_eq!(journal.creates(), 1);
        assert_eq!(journal.submissions(), 0);
    }

    #[tokio::test]
    async fn journal_tracks_close_order() {
        let connector = StubConnector::new();
        let journal = connector.journal();
        let mut conn = connector.create(1, 0).await.unwrap();

        conn.drain_events();
        assert!(!journal.closed_after_last_drain());

        conn.close();
        conn.close();
        conn.finish().await;
        assert_eq!(journal.closes(), 2);
        assert_eq!(journal.finishes(), 1);
        assert!(journal.closed_after_last_drain());
    }

    #[tokio::test]
    async fn submit_after_close_reports_not_running() {
        let connector = StubConnector::new();
        let mut conn = connector.create(1, 0).await.unwrap();
        let (seen, make) = recorder();

        conn.close();
        conn.submit_presence_update(&PresenceRecord::default(), make());
        conn.drain_events();
        assert_eq!(*seen.lock().unwrap(), vec![Err(ErrorCode::NotRunning)]);
    }

    #[tokio::test]
    async fn journal_keeps_last_record() {
        let connector = StubConnector::new();
        let journal = connector.journal();
        let mut conn = connector.create(1, 0).await.unwrap();
        let (_, make) = recorder();

        let mut record = PresenceRecord::default();
        record.set_state("first").unwrap();
        conn.submit_presence_update(&record, make());
        record.set_state("second").unwrap();
        conn.submit_presence_update(&record, make());

        assert_eq!(journal.last_record().unwrap().state(), "second");
    }
}
