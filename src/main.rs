//! openhab-voice-daemon: voice commands for openHAB lights
//!
//! Sits between a speech assistant process and an openHAB server:
//! - Reads assistant lifecycle events (JSON lines on stdin)
//! - Intercepts transcripts that start with the activation keyword
//! - Parses them into light/system intents and applies them over REST
//! - Speaks the outcome and starts conversations on button presses
//!
//! Anything not prefixed with the keyword is left to the assistant.

mod assistant;
mod backend;
mod config;
mod devices;
mod dispatch;
mod events;
mod feedback;
mod intent;
mod lifecycle;
mod session;
mod trigger;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::assistant::{spawn_event_reader, AssistantEvent, CommandWriter};
use crate::backend::OpenHabClient;
use crate::config::Config;
use crate::devices::DeviceRegistry;
use crate::dispatch::ActionExecutor;
use crate::events::StatusEvent;
use crate::feedback::{Announcer, CommandAnnouncer, LogAnnouncer, SystemPower};
use crate::intent::IntentParser;
use crate::lifecycle::ShutdownSignal;
use crate::session::SessionController;
use crate::trigger::{TriggerEvent, TriggerListener};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries assistant commands, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "openhab-voice-daemon starting"
    );

    let config = Config::load()?;
    info!(
        keyword = %config.activation_keyword,
        backend = %config.backend.items_url(),
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Assistant bridge -> session
    let (assistant_tx, assistant_rx) = mpsc::channel::<AssistantEvent>(32);
    // Trigger listener -> session
    let (trigger_tx, trigger_rx) = mpsc::channel::<TriggerEvent>(8);
    // Session -> status log
    let (status_tx, mut status_rx) = broadcast::channel::<StatusEvent>(64);

    let reader = spawn_event_reader(tokio::io::stdin(), assistant_tx);
    let (assistant, _writer) = CommandWriter::spawn(tokio::io::stdout());

    let registry = Arc::new(DeviceRegistry::from_config(&config.devices));
    if registry.is_empty() {
        warn!("no devices configured, only all-lights and system commands will work");
    } else {
        info!(devices = registry.len(), "device table loaded");
    }
    let client = Arc::new(OpenHabClient::new(&config.backend, config.debug)?);
    let power = Arc::new(SystemPower::new(&config.power));
    let announcer: Arc<dyn Announcer> = match &config.voice.command {
        Some(argv) if !argv.is_empty() => Arc::new(CommandAnnouncer::new(argv.clone())),
        _ => Arc::new(LogAnnouncer),
    };

    let executor = ActionExecutor::new(client, power, config.all_lights_group.clone());
    let mut session = SessionController::new(
        config.activation_keyword.clone(),
        IntentParser::new(registry),
        executor,
        Arc::new(assistant),
        announcer,
        status_tx,
    );

    // Start the trigger listener (runs on dedicated thread)
    let trigger_listener = config
        .trigger
        .fifo_path
        .as_ref()
        .map(|path| TriggerListener::new(path, trigger_tx.clone(), session.start_gate()));
    drop(trigger_tx);

    if let Some(listener) = &trigger_listener {
        match listener.start() {
            Ok(()) => info!("trigger listener started"),
            Err(e) => {
                error!(?e, "failed to start trigger listener");
                warn!("continuing without button support");
            }
        }
    }

    info!("daemon initialized, entering main loop");

    let result = tokio::select! {
        result = session.run(assistant_rx, trigger_rx) => result.map_err(anyhow::Error::from),

        _ = async {
            loop {
                match status_rx.recv().await {
                    Ok(event) => info!(%event, "status"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "status receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("status handler exited");
            Ok(())
        }

        signal = shutdown.wait() => signal
            .map(|reason| info!(?reason, "shutdown signal received"))
            .map_err(|e| anyhow::Error::new(e).context("failed to register signal handlers")),
    };

    info!(state = %session.state(), "shutting down...");

    if let Some(listener) = trigger_listener.as_ref().filter(|l| l.is_running()) {
        listener.stop();
    }
    reader.abort();

    match &result {
        Ok(()) => info!("openhab-voice-daemon stopped"),
        Err(e) => error!(error = %e, "openhab-voice-daemon stopped on fatal error"),
    }

    result
}
