//! The task that owns the SDK handle.

use async_trait::async_trait;
use beacon_common::{ErrorCode, SubmitResult};
use discord_sdk::activity::{ActivityBuilder, Assets};
use discord_sdk::wheel::Wheel;
use discord_sdk::Discord;
use tokio::sync::mpsc;
use tracing::debug;

use crate::record::PresenceRecord;

/// What the worker needs from the platform.
#[async_trait]
pub(crate) trait ActivityClient: Send + Sized + 'static {
    async fn update(&mut self, record: &PresenceRecord) -> SubmitResult;

    async fn disconnect(self);
}

/// Live SDK connection. The wheel is kept so its handler stays registered.
pub(crate) struct DiscordClient {
    pub discord: Discord,
    pub wheel: Wheel,
}

#[async_trait]
impl ActivityClient for DiscordClient {
    async fn update(&mut self, record: &PresenceRecord) -> SubmitResult {
        match self.discord.update_activity(activity(record)).await {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = ?e, "activity update rejected");
                Err(error_code(&e))
            }
        }
    }

    async fn disconnect(self) {
        let DiscordClient { discord, wheel } = self;
        discord.disconnect().await;
        drop(wheel);
    }
}

/// Translate a record into the SDK's activity. Empty fields are left out.
pub(crate) fn activity(record: &PresenceRecord) -> ActivityBuilder {
    let mut builder = ActivityBuilder::new().start_timestamp(record.timestamps().start());
    if !record.details().is_empty() {
        builder = builder.details(record.details());
    }
    if !record.state().is_empty() {
        builder = builder.state(record.state());
    }
    if let Some(end) = record.timestamps().end() {
        builder = builder.end_timestamp(end);
    }

    let assets = record.assets();
    let text = |value: &str| (!value.is_empty()).then(|| value.to_string());
    let mut sdk_assets = Assets::default();
    let mut has_assets = false;
    if !assets.large_image.is_empty() {
        sdk_assets = sdk_assets.large(assets.large_image.as_str(), text(&assets.large_text));
        has_assets = true;
    }
    if !assets.small_image.is_empty() {
        sdk_assets = sdk_assets.small(assets.small_image.as_str(), text(&assets.small_text));
        has_assets = true;
    }
    if has_assets {
        builder = builder.assets(sdk_assets);
    }
    builder
}

/// Map an SDK failure onto the platform status codes.
pub(crate) fn error_code(err: &discord_sdk::Error) -> ErrorCode {
    match err {
        discord_sdk::Error::NoConnection => ErrorCode::NotRunning,
        discord_sdk::Error::TimedOut => ErrorCode::ServiceUnavailable,
        discord_sdk::Error::Io { .. } => ErrorCode::ServiceUnavailable,
        _ => ErrorCode::InternalError,
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) enum Command {
    Update { seq: u64, record: PresenceRecord },
    Disconnect,
}

#[derive(Debug)]
pub(crate) struct Completion {
    pub seq: u64,
    pub result: SubmitResult,
}

/// Apply updates in the order they were queued, then disconnect. Ends on
/// [`Command::Disconnect`] or when the connection side goes away.
pub(crate) async fn run<A: ActivityClient>(
    mut client: A,
    mut commands: mpsc::UnboundedReceiver<Command>,
    completions: mpsc::UnboundedSender<Completion>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Update { seq, record } => {
                let result = client.update(&record).await;
                if completions.send(Completion { seq, result }).is_err() {
                    break;
                }
            }
            Command::Disconnect => break,
        }
    }

    client.disconnect().await;
    debug!("presence daemon disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_connection_maps_to_not_running() {
        assert_eq!(
            error_code(&discord_sdk::Error::NoConnection),
            ErrorCode::NotRunning
        );
        assert_eq!(
            error_code(&discord_sdk::Error::TimedOut),
            ErrorCode::ServiceUnavailable
        );
    }
}
