//! Adapter for the local presence daemon.
//!
//! Socket discovery, framing and the handshake belong to `discord-sdk`.
//! This module puts the SDK behind [`Connector`](super::Connector) and
//! [`PresenceConnection`](super::PresenceConnection): a worker task owns
//! the SDK handle and applies updates one at a time, and results travel
//! back over a channel until the loop drains them.

mod client;
mod worker;

pub use client::{IpcConnection, IpcConnector, CLOSE_TIMEOUT, DEFAULT_HANDSHAKE_TIMEOUT};
