//! # remote-window - protocol replay tool
//!
//! Replays a recorded stream of protocol events through the surface core on
//! headless collaborators and prints every pointer call that would have been
//! forwarded to the remote server, as JSON.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};

use remote_window::headless::{HeadlessProvider, RecordingClient, RecordingLayerFactory};
use remote_window::protocol::{AppMetadata, ProtocolEvent};
use remote_window::{logging, RemoteWindowConfig, SurfaceSession};

#[derive(Parser)]
#[command(name = "remote-window")]
#[command(about = "Replay remote-desktop window events through the surface core")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/remote-window/remote-window.toml")]
    config: String,

    /// JSON file holding an array of protocol events
    #[arg(short, long)]
    script: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Application name used as the fallback window title
    #[arg(long, default_value = "Remote Desktop")]
    app_name: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = RemoteWindowConfig::load(&cli.config);
    let debug = cli.debug || loaded.as_ref().map_or(false, |c| c.general.debug);
    logging::init(debug)?;

    info!("Starting remote-window {}", remote_window::VERSION);
    if let Some(date) = option_env!("BUILD_DATE") {
        debug!(
            "Built {} for {} ({})",
            date,
            option_env!("TARGET_TRIPLE").unwrap_or("unknown target"),
            option_env!("GIT_COMMIT").unwrap_or("unknown commit")
        );
    }

    let config = match loaded {
        Ok(config) => {
            info!("Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            info!("Using default configuration");
            RemoteWindowConfig::default()
        }
    };

    let script = fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script: {}", cli.script.display()))?;
    let events: Vec<ProtocolEvent> = serde_json::from_str(&script)
        .with_context(|| format!("Failed to parse script: {}", cli.script.display()))?;
    info!("Replaying {} event(s)", events.len());

    let client = Rc::new(RecordingClient::new());
    let mut session = SurfaceSession::new(
        HeadlessProvider::new(config.headless.top_margin),
        client.clone(),
        Box::new(RecordingLayerFactory::new()),
        config,
        AppMetadata::new(cli.app_name),
    );

    for (index, event) in events.into_iter().enumerate() {
        session
            .handle(event)
            .with_context(|| format!("Event #{} failed", index))?;
    }
    session.shutdown()?;

    println!("{}", serde_json::to_string_pretty(&client.calls())?);
    info!("Forwarded {} pointer call(s)", client.len());
    Ok(())
}
