// ABOUTME: Typed repositories over the key-value store
// ABOUTME: Session history (newest first), runner settings and coach chat log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use std::sync::Arc;
use stride_core::constants::storage_keys;
use stride_core::models::{ConversationEntry, RunnerSettings, Session};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::{load_typed, save_typed, KeyValueStore};
use crate::errors::AppResult;

/// Append-only history of finalized sessions, newest first
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl SessionRepository {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Prepend a session to the history
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or written.
    pub async fn prepend(&self, session: &Session) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut sessions = self.list().await?;
        sessions.insert(0, session.clone());
        save_typed(self.store.as_ref(), storage_keys::SESSIONS, &sessions).await?;
        info!(
            session_id = %session.id,
            distance_m = session.distance_m,
            total = sessions.len(),
            "Session persisted"
        );
        Ok(())
    }

    /// All sessions, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or decoded.
    pub async fn list(&self) -> AppResult<Vec<Session>> {
        Ok(load_typed(self.store.as_ref(), storage_keys::SESSIONS)
            .await?
            .unwrap_or_default())
    }

    /// Most recently saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or decoded.
    pub async fn latest(&self) -> AppResult<Option<Session>> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Session by id
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or decoded.
    pub async fn find(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }
}

/// Runner settings document
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings, or defaults when none were saved
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    pub async fn load(&self) -> AppResult<RunnerSettings> {
        Ok(load_typed(self.store.as_ref(), storage_keys::SETTINGS)
            .await?
            .unwrap_or_default())
    }

    /// Replace the stored settings
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub async fn save(&self, settings: &RunnerSettings) -> AppResult<()> {
        save_typed(self.store.as_ref(), storage_keys::SETTINGS, settings).await
    }
}

/// Persisted coach conversation, oldest first
#[derive(Clone)]
pub struct ChatLog {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ChatLog {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Full conversation history
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read or decoded.
    pub async fn history(&self) -> AppResult<Vec<ConversationEntry>> {
        Ok(load_typed(self.store.as_ref(), storage_keys::CHAT)
            .await?
            .unwrap_or_default())
    }

    /// Append entries in order
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read or written.
    pub async fn append(&self, entries: &[ConversationEntry]) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut log = self.history().await?;
        log.extend_from_slice(entries);
        save_typed(self.store.as_ref(), storage_keys::CHAT, &log).await
    }
}
