//! Tidings host: notification lifecycle and event bridge process.
//!
//! Wires all crates together, reads JSON input lines from stdin and writes
//! delivered events and command responses as JSON lines to stdout. Logs go
//! to stderr.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

use tidings_core::config::AppConfig;
use tidings_core::error::AppError;
use tidings_core::events::AppState;
use tidings_media::{
    AssetStager, AudioResourceManager, LocalAssetSource, LoggingOutput, SharedVolume,
};
use tidings_realtime::{AppStateTracker, ChannelSink, EventBridge};
use tidings_service::{
    CallbackRegistry, LoggingRenderer, NotificationBuilder, NotificationRenderer,
    NotificationService, PushHandler, TokioTriggerScheduler,
};
use tidings_store::LifecycleStore;

mod host;

use host::{Host, HostOutput};

/// Tidings notification lifecycle host
#[derive(Debug, Parser)]
#[command(name = "tidings-host", version, about, long_about = None)]
struct Cli {
    /// Directory holding `default.toml` and per-environment overlays
    #[arg(short, long, default_value = "config")]
    config_dir: String,

    /// Environment overlay to load (falls back to `TIDINGS_ENV`)
    #[arg(short, long)]
    env: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Host error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("TIDINGS_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    AppConfig::load_from(&cli.config_dir, &env)
}

/// Initialize tracing/logging on stderr
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Main host run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Tidings host v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Event bridge ──
    let initial_state = if config.bridge.start_in_background {
        AppState::Background
    } else {
        AppState::Foreground
    };
    let app_state = Arc::new(AppStateTracker::new(initial_state));
    let (sink, mut envelopes) = ChannelSink::new();
    let bridge = Arc::new(EventBridge::new(
        Arc::new(sink),
        Arc::clone(&app_state),
        config.bridge.backlog_warning,
    ));

    // ── Step 2: Audio ──
    let staging_dir = config.audio.staging_path();
    tracing::info!(
        "Audio assets from '{}', staging in '{}'",
        config.audio.asset_dir,
        staging_dir.display()
    );
    let audio = Arc::new(AudioResourceManager::new(
        Arc::new(LocalAssetSource::new(&config.audio.asset_dir)),
        AssetStager::new(staging_dir),
        Arc::new(SharedVolume::new(
            config.audio.initial_volume,
            config.audio.max_volume,
        )),
        Arc::new(LoggingOutput),
    ));

    // ── Step 3: Services ──
    let store = Arc::new(LifecycleStore::new());
    let registry = Arc::new(CallbackRegistry::new());
    let builder = NotificationBuilder::new(config.builder.clone());
    let renderer: Arc<dyn NotificationRenderer> = Arc::new(LoggingRenderer);
    let (scheduler, fired) = TokioTriggerScheduler::new()?;

    let push = PushHandler::new(
        Arc::clone(&bridge),
        Arc::clone(&audio),
        builder.clone(),
        Arc::clone(&registry),
        Arc::clone(&renderer),
        Arc::clone(&app_state),
        config.push.clone(),
    );
    let service = Arc::new(NotificationService::new(
        store,
        Arc::clone(&bridge),
        Arc::clone(&audio),
        builder,
        registry,
        renderer,
        Arc::new(scheduler),
        app_state,
        push,
    ));
    tracing::info!("Services initialized");

    // ── Step 4: Trigger loop ──
    let triggers = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.run_triggers(fired).await })
    };

    // ── Step 5: Input loop ──
    let host = Host::new(Arc::clone(&service));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tracing::info!("Reading input from stdin");
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    if let Some(output) = host.handle_line(&line).await {
                        emit(&output);
                    }
                }
                None => {
                    tracing::info!("Input closed");
                    break;
                }
            },
            Some(envelope) = envelopes.recv() => emit(&HostOutput::Event { envelope }),
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    // ── Step 6: Shutdown ──
    service.on_destroy();
    audio.stop_all().await;
    triggers.abort();
    while let Ok(envelope) = envelopes.try_recv() {
        emit(&HostOutput::Event { envelope });
    }

    let metrics = service.bridge_metrics();
    tracing::info!(
        fired = metrics.fired,
        delivered = metrics.delivered + metrics.flushed,
        buffered = metrics.buffered,
        failed = metrics.failed,
        "Tidings host shut down"
    );
    Ok(())
}

/// Print one protocol line on stdout
fn emit(output: &HostOutput) {
    match serde_json::to_string(output) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("Failed to encode output: {}", e),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
