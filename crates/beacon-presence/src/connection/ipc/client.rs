//! Connector and connection handle over `discord-sdk`.
//!
//! The [`IpcConnection`] never awaits the platform itself. It queues
//! commands for the worker task and, on every drain, delivers finished
//! results strictly in submission order.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use beacon_common::{ErrorCode, SubmitResult};
use discord_sdk::wheel::{UserState, Wheel};
use discord_sdk::{Discord, Subscriptions};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::worker::{self, ActivityClient, Command, Completion, DiscordClient};
use crate::connection::{Connector, PresenceConnection, ResultCallback};
use crate::record::PresenceRecord;

/// Default time allowed for the daemon handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on [`PresenceConnection::finish`]: queued updates plus the
/// disconnect must complete within it.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Opens connections to the local presence daemon.
#[derive(Debug, Clone)]
pub struct IpcConnector {
    handshake_timeout: Duration,
}

impl IpcConnector {
    pub fn new() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }
}

impl Default for IpcConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for IpcConnector {
    type Connection = IpcConnection;

    async fn create(&self, application_id: u64, flags: u64) -> Result<IpcConnection, ErrorCode> {
        let app_id = i64::try_from(application_id).map_err(|_| {
            warn!(application_id, "Application id does not fit the platform's id range");
            ErrorCode::ApplicationMismatch
        })?;
        if flags != 0 {
            debug!(flags, "create flags have no meaning for the daemon transport");
        }

        let (wheel, handler) = Wheel::new(Box::new(|err| {
            warn!(error = ?err, "Presence daemon error");
        }));
        let mut user = wheel.user();

        let discord = Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler)).map_err(|e| {
            warn!(error = ?e, "Presence daemon not available");
            worker::error_code(&e)
        })?;

        debug!(timeout_secs = self.handshake_timeout.as_secs(), "waiting for presence daemon handshake");
        let handshake = tokio::time::timeout(self.handshake_timeout, wait_connected(&mut user.0)).await;
        let failure = match handshake {
            Ok(Ok(username)) => {
                info!(user = %username, "Presence daemon handshake complete");
                None
            }
            Ok(Err(code)) => Some(code),
            Err(_) => {
                warn!("Presence daemon handshake timed out after {}s", self.handshake_timeout.as_secs());
                Some(ErrorCode::ServiceUnavailable)
            }
        };
        if let Some(code) = failure {
            discord.disconnect().await;
            return Err(code);
        }

        Ok(IpcConnection::spawn(DiscordClient { discord, wheel }))
    }
}

/// Wait for the first user-state change after connecting.
async fn wait_connected(user: &mut watch::Receiver<UserState>) -> Result<String, ErrorCode> {
    if user.changed().await.is_err() {
        warn!("Presence daemon connection closed during handshake");
        return Err(ErrorCode::ServiceUnavailable);
    }
    let state = user.borrow();
    match &*state {
        UserState::Connected(user) => Ok(user.username.clone()),
        UserState::Disconnected(err) => {
            warn!(error = ?err, "Presence daemon disconnected during handshake");
            Err(worker::error_code(err))
        }
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// One submission, in submission order. `result` is filled in once the
/// worker reports back or the submission fails locally.
struct Slot {
    seq: u64,
    callback: ResultCallback,
    result: Option<SubmitResult>,
}

/// Open connection to the presence daemon.
pub struct IpcConnection {
    commands: mpsc::UnboundedSender<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    slots: VecDeque<Slot>,
    next_seq: u64,
    worker: Option<JoinHandle<()>>,
    connected: bool,
    closed: bool,
}

impl IpcConnection {
    /// Start the worker task around an already-connected client.
    pub(crate) fn spawn<A: ActivityClient>(client: A) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let worker = tokio::spawn(worker::run(client, command_rx, completion_tx));

        Self {
            commands,
            completions,
            slots: VecDeque::new(),
            next_seq: 0,
            worker: Some(worker),
            connected: true,
            closed: false,
        }
    }

    /// Submissions still waiting for the platform.
    pub fn in_flight(&self) -> usize {
        self.slots.iter().filter(|slot| slot.result.is_none()).count()
    }

    fn push(&mut self, callback: ResultCallback, result: Option<SubmitResult>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.push_back(Slot {
            seq,
            callback,
            result,
        });
        seq
    }

    fn resolve(&mut self, seq: u64, result: SubmitResult) {
        match self.slots.iter_mut().find(|slot| slot.seq == seq) {
            Some(slot) => slot.result = Some(result),
            None => debug!(seq, "result for unknown submission"),
        }
    }

    fn fail_unresolved(&mut self, code: ErrorCode) {
        for slot in self.slots.iter_mut().filter(|slot| slot.result.is_none()) {
            slot.result = Some(Err(code));
        }
    }
}

#[async_trait]
impl PresenceConnection for IpcConnection {
    fn drain_events(&mut self) {
        loop {
            match self.completions.try_recv() {
                Ok(Completion { seq, result }) => self.resolve(seq, result),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if self.connected && !self.closed {
                        warn!("Lost connection to presence daemon");
                    }
                    self.connected = false;
                    self.fail_unresolved(ErrorCode::NotRunning);
                    break;
                }
            }
        }

        while self.slots.front().is_some_and(|slot| slot.result.is_some()) {
            if let Some(Slot {
                callback,
                result: Some(result),
                ..
            }) = self.slots.pop_front()
            {
                callback(result);
            }
        }
    }

    fn submit_presence_update(&mut self, record: &PresenceRecord, on_result: ResultCallback) {
        if !self.connected || self.closed {
            self.push(on_result, Some(Err(ErrorCode::NotRunning)));
            return;
        }

        let seq = self.push(on_result, None);
        let command = Command::Update {
            seq,
            record: record.clone(),
        };
        if self.commands.send(command).is_err() {
            self.resolve(seq, Err(ErrorCode::NotRunning));
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.commands.send(Command::Disconnect);
        debug!(in_flight = self.in_flight(), "presence daemon connection closing");
    }

    async fn finish(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut worker).await.is_err() {
            warn!("Presence daemon did not acknowledge disconnect within {}s", CLOSE_TIMEOUT.as_secs());
            worker.abort();
            let _ = worker.await;
        }
    }
}
