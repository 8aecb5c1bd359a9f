// ABOUTME: Key-value persistence port for settings, session history and chat log
// ABOUTME: Pluggable backends (in-memory, JSON files) behind one async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Persistence Port
//!
//! Durable state is stored as one JSON document per key. Components never
//! touch a backend directly: they receive a typed repository wrapping an
//! `Arc<dyn KeyValueStore>` constructed at process start.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride_coach::storage::{memory::InMemoryStore, KeyValueStore, SettingsRepository};
//! # async fn example() -> Result<(), stride_coach::errors::AppError> {
//! let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
//! let settings = SettingsRepository::new(store).load().await?;
//! assert!(settings.auto_pause);
//! # Ok(())
//! # }
//! ```

/// JSON file backend
pub mod file;
/// In-memory backend
pub mod memory;
mod repositories;

pub use repositories::{ChatLog, SessionRepository, SettingsRepository};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Durable key-value store holding JSON documents
///
/// Every `put` is flushed before it returns.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;

    /// Replace the document stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written.
    async fn put(&self, key: &str, value: Value) -> AppResult<()>;

    /// Backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}

/// Read and decode a typed document
pub(crate) async fn load_typed<T>(store: &dyn KeyValueStore, key: &str) -> AppResult<Option<T>>
where
    T: DeserializeOwned,
{
    store
        .get(key)
        .await?
        .map(|value| {
            serde_json::from_value(value).map_err(|e| {
                AppError::serialization(format!("stored '{key}' document is invalid: {e}"))
                    .with_source(e)
            })
        })
        .transpose()
}

/// Encode and write a typed document
pub(crate) async fn save_typed<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> AppResult<()>
where
    T: Serialize + Sync,
{
    store.put(key, serde_json::to_value(value)?).await
}
