// ABOUTME: Stride CLI - replay recorded runs, browse history, export GPX and chat with the coach
// ABOUTME: Wires configuration, file-backed storage and logging, then dispatches subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors
//!
//! Usage:
//! ```bash
//! # Replay a recorded track through the live runtime, 20x faster than recorded
//! stride-cli replay morning.json --speedup 20 --goal-km 10 --goal-pace 4:50
//!
//! # List saved sessions, newest first
//! stride-cli sessions
//!
//! # Export a session (id or unique id prefix) as GPX
//! stride-cli export 3f2c9a1e --out morning.gpx
//!
//! # Ask the coach about the last run
//! stride-cli chat "How should I pace my next tempo run?"
//!
//! # Show or change settings
//! stride-cli settings --target-pace 4:40 --auto-pause off
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use stride_coach::config::AppConfig;
use stride_coach::logging::LoggingConfig;
use stride_coach::storage::file::FileStore;
use stride_coach::storage::KeyValueStore;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "stride-cli",
    about = "Stride running coach",
    long_about = "Replay recorded runs through the live tracker, browse saved sessions, export GPX and chat with the coach."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override (defaults to STRIDE_DATA_DIR or ~/.stride)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a recorded track (JSON or CSV) through the live runtime
    Replay {
        /// Track file
        track: PathBuf,

        /// Replay speed relative to the recorded timestamps
        #[arg(long, default_value_t = 1.0)]
        speedup: f64,

        /// Distance goal in kilometers
        #[arg(long)]
        goal_km: Option<f64>,

        /// Goal pace as MM:SS per kilometer (requires --goal-km)
        #[arg(long, requires = "goal_km")]
        goal_pace: Option<String>,

        /// Disable automatic pause and resume
        #[arg(long)]
        no_auto_pause: bool,
    },

    /// List saved sessions, newest first
    Sessions,

    /// Export a saved session as GPX
    Export {
        /// Session id or unique prefix
        id: String,

        /// Output file (defaults to a name derived from the session)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the coach a question
    Chat {
        /// Message to send
        message: Vec<String>,
    },

    /// Show or change runner settings
    Settings {
        /// Target pace as MM:SS per kilometer
        #[arg(long)]
        target_pace: Option<String>,

        /// Automatic pause and resume
        #[arg(long)]
        auto_pause: Option<Toggle>,

        /// Spoken cues
        #[arg(long)]
        voice: Option<Toggle>,
    },
}

/// On/off switch for boolean settings
#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        matches!(toggle, Toggle::On)
    }
}

/// Configuration and storage shared by every command
pub struct App {
    config: AppConfig,
    store: Arc<dyn KeyValueStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::for_cli();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = AppConfig::from_env().context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let store = FileStore::open(&config.data_dir)
        .await
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    debug!(data_dir = %config.data_dir.display(), "Using file store");

    let app = App {
        config,
        store: Arc::new(store),
    };

    match cli.command {
        Command::Replay {
            track,
            speedup,
            goal_km,
            goal_pace,
            no_auto_pause,
        } => {
            commands::replay::run(&app, &track, speedup, goal_km, goal_pace.as_deref(), no_auto_pause)
                .await?;
        }
        Command::Sessions => commands::sessions::list(&app).await?,
        Command::Export { id, out } => commands::export::run(&app, &id, out).await?,
        Command::Chat { message } => commands::chat::send(&app, &message.join(" ")).await?,
        Command::Settings {
            target_pace,
            auto_pause,
            voice,
        } => {
            commands::settings::run(
                &app,
                target_pace.as_deref(),
                auto_pause.map(bool::from),
                voice.map(bool::from),
            )
            .await?;
        }
    }

    Ok(())
}
