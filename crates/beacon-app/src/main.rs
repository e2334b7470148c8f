mod bootstrap;
mod cli;
mod signals;

use std::process::ExitCode;

use beacon_common::BeaconError;
use beacon_config::{BeaconConfig, Transport};
use beacon_presence::{
    Connector, LoopExit, LoopSettings, PresenceRecord, PresenceSyncLoop, SignalLatch,
    StubConnector,
};
use tracing_subscriber::filter::LevelFilter;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("Beacon panicked: {info}");
        default_hook(info);
    }));
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run the sync loop on its own task so a panic inside it still ends in
/// an orderly exit status.
async fn run_loop<C>(
    connector: C,
    record: PresenceRecord,
    settings: LoopSettings,
    latch: SignalLatch,
) -> LoopExit
where
    C: Connector + 'static,
{
    let sync = PresenceSyncLoop::new(connector, record, settings, latch);
    match tokio::spawn(sync.run()).await {
        Ok(exit) => exit,
        Err(e) => {
            tracing::error!("Presence loop task failed: {e}");
            LoopExit::Fault(e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = beacon_config::load_config(args.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_logging(&bootstrap::log_directive(args.log_level.as_deref(), &config));
    install_panic_hook();

    tracing::info!("Beacon v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::info!(
        application_id = config.application.id,
        transport = ?config.connection.transport,
        category = %config.presence.category,
        "Config loaded"
    );

    let exit = start(&config).await;
    if exit == LoopExit::Clean {
        tracing::info!("Shutdown complete");
    }
    exit.into()
}

/// Everything a run needs before the first connection attempt.
#[derive(Debug)]
struct Prepared {
    record: PresenceRecord,
    settings: LoopSettings,
    latch: SignalLatch,
    signal_task: JoinHandle<()>,
}

fn prepare(config: &BeaconConfig, now: i64) -> beacon_common::Result<Prepared> {
    let record = bootstrap::initial_record(&config.presence, now)
        .map_err(|e| BeaconError::Record(e.to_string()))?;
    let settings = bootstrap::loop_settings(config);

    let latch = SignalLatch::new();
    let signal_task = signals::install(latch.clone())?;

    Ok(Prepared {
        record,
        settings,
        latch,
        signal_task,
    })
}

async fn start(config: &BeaconConfig) -> LoopExit {
    let Prepared {
        record,
        settings,
        latch,
        signal_task,
    } = match prepare(config, chrono::Utc::now().timestamp()) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            return LoopExit::Fault(e.to_string());
        }
    };

    let exit = match config.connection.transport {
        Transport::Ipc => {
            let connector = bootstrap::ipc_connector(&config.connection);
            run_loop(connector, record, settings, latch).await
        }
        Transport::Stub => {
            tracing::info!("Using in-process stub connection");
            run_loop(StubConnector::new(), record, settings, latch).await
        }
    };

    signal_task.abort();
    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use beacon_common::ErrorCode;
    use beacon_presence::{PresenceConnection, ResultCallback};
    use std::time::Duration;

    fn record() -> PresenceRecord {
        bootstrap::initial_record(&BeaconConfig::default().presence, 0).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn stub_run_stops_cleanly() {
        let latch = SignalLatch::new();
        let stopper = {
            let latch = latch.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                latch.request_stop();
            })
        };

        let exit = run_loop(StubConnector::new(), record(), LoopSettings::default(), latch).await;
        stopper.await.unwrap();

        assert_eq!(exit, LoopExit::Clean);
        assert_eq!(exit.code(), 0);
    }

    #[tokio::test]
    async fn unavailable_platform_exits_one() {
        let connector = StubConnector::new().failing(ErrorCode::ServiceUnavailable);
        let exit = run_loop(connector, record(), LoopSettings::default(), SignalLatch::new()).await;

        assert_eq!(exit, LoopExit::StartupFailed(ErrorCode::ServiceUnavailable));
        assert_eq!(exit.code(), 1);
    }

    struct PanickingConnector;
    struct PanickingConnection;

    #[async_trait]
    impl Connector for PanickingConnector {
        type Connection = PanickingConnection;

        async fn create(&self, _: u64, _: u64) -> Result<PanickingConnection, ErrorCode> {
            Ok(PanickingConnection)
        }
    }

    #[async_trait]
    impl PresenceConnection for PanickingConnection {
        fn drain_events(&mut self) {
            panic!("drain exploded");
        }

        fn submit_presence_update(&mut self, _: &PresenceRecord, _: ResultCallback) {}

        fn close(&mut self) {}
    }

    #[tokio::test]
    async fn panic_inside_loop_is_a_fault() {
        let exit = run_loop(
            PanickingConnector,
            record(),
            LoopSettings::default(),
            SignalLatch::new(),
        )
        .await;

        assert!(matches!(exit, LoopExit::Fault(_)));
        assert_eq!(exit.code(), 1);
    }

    #[tokio::test]
    async fn oversized_record_fails_preparation() {
        let mut config = BeaconConfig::default();
        config.presence.state = "s".repeat(129);

        let err = prepare(&config, 0).unwrap_err();
        assert!(matches!(err, BeaconError::Record(_)));

        let exit = start(&config).await;
        assert!(matches!(exit, LoopExit::Fault(_)));
        assert_eq!(exit.code(), 1);
    }

    #[tokio::test]
    async fn default_config_prepares() {
        let prepared = prepare(&BeaconConfig::default(), 1_700_000_000).unwrap();
        assert_eq!(prepared.record.timestamps().start(), 1_700_000_000);
        assert!(prepared.latch.is_running());
        prepared.signal_task.abort();
    }
}
