// ABOUTME: Sessions command: lists the saved run history
// ABOUTME: Newest first with distance, moving time, pace and elevation gain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use anyhow::{Context, Result};
use std::sync::Arc;
use stride_coach::storage::SessionRepository;

use crate::helpers::display::display_sessions;
use crate::App;

/// Print every saved session
pub async fn list(app: &App) -> Result<()> {
    let sessions = SessionRepository::new(Arc::clone(&app.store))
        .list()
        .await
        .context("reading session history")?;
    display_sessions(&sessions);
    Ok(())
}
