// ABOUTME: Export command: writes a saved session as a GPX 1.1 file
// ABOUTME: Sessions are addressed by full id or a unique id prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use stride_coach::export::{gpx_file_name, to_gpx};
use stride_coach::models::Session;
use stride_coach::storage::SessionRepository;
use tracing::info;

use crate::App;

/// Export one session
pub async fn run(app: &App, id: &str, out: Option<PathBuf>) -> Result<()> {
    let sessions = SessionRepository::new(Arc::clone(&app.store))
        .list()
        .await
        .context("reading session history")?;
    let session = select_session(&sessions, id)?;

    let path = out.unwrap_or_else(|| PathBuf::from(gpx_file_name(session)));
    tokio::fs::write(&path, to_gpx(session))
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(session_id = %session.id, path = %path.display(), "Session exported");
    println!("Exported '{}' to {}", session.name, path.display());
    Ok(())
}

fn select_session<'a>(sessions: &'a [Session], id: &str) -> Result<&'a Session> {
    let needle = id.trim().to_lowercase();
    if needle.is_empty() {
        bail!("session id must not be empty");
    }
    let mut matches = sessions
        .iter()
        .filter(|s| s.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(session), None) => Ok(session),
        (Some(_), Some(_)) => bail!("session id prefix '{id}' is ambiguous"),
        (None, _) => bail!("no saved session matches '{id}'"),
    }
}
