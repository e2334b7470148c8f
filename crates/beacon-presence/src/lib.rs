//! Rich presence publishing.
//!
//! A [`PresenceSyncLoop`] owns one [`PresenceRecord`] and one platform
//! connection, pushes the record at startup and every
//! [`REFRESH_INTERVAL`], drains acknowledgements cooperatively, and stops
//! when its [`SignalLatch`] is tripped.

pub mod connection;
pub mod latch;
pub mod record;
pub mod sync_loop;

pub use connection::ipc::{IpcConnection, IpcConnector};
pub use connection::stub::{StubConnection, StubConnector, StubJournal};
pub use connection::{Connector, PresenceConnection, ResultCallback};
pub use latch::SignalLatch;
pub use record::{Assets, PresenceRecord, RecordBuilder, RecordError, Timestamps};
pub use sync_loop::{
    LoopExit, LoopSettings, PresenceSyncLoop, StatsSnapshot, SyncStats, DEFAULT_ACTIVE_STATE,
    DEFAULT_POLL_INTERVAL, REFRESH_INTERVAL,
};
