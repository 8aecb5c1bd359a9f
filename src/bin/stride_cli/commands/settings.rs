// ABOUTME: Settings command: shows and updates persisted runner preferences
// ABOUTME: Only the flags given are changed; the document is saved once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use anyhow::{Context, Result};
use std::sync::Arc;
use stride_coach::formatters::parse_pace;
use stride_coach::storage::SettingsRepository;
use tracing::info;

use crate::helpers::display::display_settings;
use crate::App;

/// Apply the given changes, then print the settings
pub async fn run(
    app: &App,
    target_pace: Option<&str>,
    auto_pause: Option<bool>,
    voice: Option<bool>,
) -> Result<()> {
    let repository = SettingsRepository::new(Arc::clone(&app.store));
    let mut settings = repository.load().await.context("loading settings")?;
    let mut changed = false;

    if let Some(text) = target_pace {
        settings.target_pace_sec_per_km =
            parse_pace(text).with_context(|| format!("invalid pace '{text}', expected MM:SS"))?;
        changed = true;
    }
    if let Some(enabled) = auto_pause {
        settings.auto_pause = enabled;
        changed = true;
    }
    if let Some(enabled) = voice {
        settings.voice_cues = enabled;
        changed = true;
    }

    if changed {
        repository.save(&settings).await.context("saving settings")?;
        info!(?settings, "Settings updated");
    }
    display_settings(&settings);
    Ok(())
}
