// ABOUTME: Replay command: feeds a recorded track through the live run runtime
// ABOUTME: Prints progress and spoken cues, then the saved session summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stride_coach::coach::CoachingService;
use stride_coach::elevation::OpenElevationClient;
use stride_coach::finalizer::{FinalizerConfig, SessionFinalizer};
use stride_coach::formatters::parse_pace;
use stride_coach::llm::OpenAiCompatibleProvider;
use stride_coach::models::Goal;
use stride_coach::runtime::{ReplaySource, RunContext, RunController};
use stride_coach::storage::{SessionRepository, SettingsRepository};
use tracing::info;

use crate::helpers::console::ConsoleSpeech;
use crate::helpers::display::display_session_summary;
use crate::App;

/// Progress line cadence
const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Replay a track until it ends or Ctrl-C, then stop and save
pub async fn run(
    app: &App,
    track: &Path,
    speedup: f64,
    goal_km: Option<f64>,
    goal_pace: Option<&str>,
    no_auto_pause: bool,
) -> Result<()> {
    let goal = build_goal(goal_km, goal_pace)?;

    let mut settings = SettingsRepository::new(Arc::clone(&app.store))
        .load()
        .await
        .context("loading settings")?;
    if no_auto_pause {
        settings.auto_pause = false;
    }

    let source = ReplaySource::from_path(track, speedup).await?;
    let finished = source.finished();
    println!(
        "Replaying {} ({} samples, {speedup}x)",
        track.display(),
        source.len()
    );

    let config = &app.config;
    let finalizer = SessionFinalizer::new(
        Arc::new(OpenElevationClient::new(&config.elevation)),
        SessionRepository::new(Arc::clone(&app.store)),
        FinalizerConfig {
            elevation_batch_size: config.elevation.batch_size,
            min_ascent_m: config.telemetry.min_ascent_m,
            ..FinalizerConfig::default()
        },
    );
    let provider = Arc::new(OpenAiCompatibleProvider::new(config.llm.clone()));
    let coaching = CoachingService::new(provider, &config.llm);

    let run = RunController::spawn(RunContext {
        telemetry: config.telemetry,
        cues: config.cues,
        settings,
        source: Box::new(source),
        speech: Arc::new(ConsoleSpeech),
        coaching: Some(coaching),
        finalizer,
    });
    run.start(goal).await?;
    info!("Replay started");

    let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
    progress.tick().await;
    loop {
        tokio::select! {
            () = finished.notified() => break,
            _ = tokio::signal::ctrl_c() => {
                println!("\nInterrupted, stopping run");
                break;
            }
            _ = progress.tick() => {
                let snapshot = run.snapshot().await?;
                println!("  [{}] {}", snapshot.phase, snapshot.describe());
            }
        }
    }

    match run.stop().await? {
        Some(session) => display_session_summary(&session),
        None => println!("\nRun too short to save (needs at least 50 m and 5 points)."),
    }
    Ok(())
}

fn build_goal(goal_km: Option<f64>, goal_pace: Option<&str>) -> Result<Option<Goal>> {
    let Some(target_km) = goal_km else {
        return Ok(None);
    };
    if !(target_km.is_finite() && target_km > 0.0) {
        bail!("--goal-km must be a positive number of kilometers");
    }
    let target_pace_sec_per_km = match goal_pace {
        Some(text) => Some(
            parse_pace(text).with_context(|| format!("invalid pace '{text}', expected MM:SS"))?,
        ),
        None => None,
    };
    Ok(Some(Goal::Distance {
        target_km,
        target_pace_sec_per_km,
    }))
}
