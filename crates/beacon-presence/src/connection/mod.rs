//! Capability interface to the presence platform.
//!
//! The sync loop only ever talks to a [`Connector`] and the
//! [`PresenceConnection`] it yields. Two adapters ship with the crate:
//! [`stub`] (in-process, always succeeds, also the test double) and
//! [`ipc`] (the local presence daemon, through `discord-sdk`).

pub mod ipc;
pub mod stub;

use async_trait::async_trait;
use beacon_common::{ErrorCode, SubmitResult};

use crate::record::PresenceRecord;

/// Completion callback for one submission. Runs on the loop's own task,
/// from inside [`PresenceConnection::drain_events`].
pub type ResultCallback = Box<dyn FnOnce(SubmitResult) + Send + 'static>;

/// Establishes platform connections.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: PresenceConnection;

    /// Open a connection for `application_id`. Any error is fatal to the
    /// caller; there is no retry.
    async fn create(&self, application_id: u64, flags: u64)
        -> Result<Self::Connection, ErrorCode>;
}

/// An open platform connection.
#[async_trait]
pub trait PresenceConnection: Send {
    /// Deliver every queued callback. Never blocks.
    fn drain_events(&mut self);

    /// Queue an update and return immediately. `on_result` fires from a
    /// later [`drain_events`](Self::drain_events) call, never from here.
    fn submit_presence_update(&mut self, record: &PresenceRecord, on_result: ResultCallback);

    /// Release the connection. Safe to call more than once.
    fn close(&mut self);

    /// Wait, bounded, for the release started by [`close`](Self::close)
    /// to reach the platform. Callbacks still pending are not delivered.
    async fn finish(&mut self) {}
}
