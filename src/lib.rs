// ABOUTME: Main library entry point for the Stride running coach
// ABOUTME: Live run tracking runtime, coaching cues, session finalization, history and export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Stride Coach
//!
//! A personal running coach: it tracks a run from a stream of location
//! samples, speaks splits and coaching cues while the runner is moving, and
//! keeps a history of finalized sessions that can be exported as GPX or
//! discussed with the coach.
//!
//! ## Architecture
//!
//! - **stride-core**: errors, domain models, constants and formatters
//! - **stride-telemetry**: the pure telemetry pipeline (filter, speed fusion,
//!   distance/elevation accumulation, split detection)
//! - **tracker**: the run state machine composing the pipeline
//! - **runtime**: the async task that owns a tracker and serializes samples,
//!   commands, timers and coaching replies through one queue
//! - **finalizer** / **elevation**: turn a stopped run into a saved session
//! - **llm** / **coach**: coaching text for live cues and the coach chat
//! - **storage**: key-value persistence port with typed repositories
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride_coach::config::AppConfig;
//! use stride_coach::elevation::OpenElevationClient;
//! use stride_coach::finalizer::{FinalizerConfig, SessionFinalizer};
//! use stride_coach::runtime::{ReplaySource, RunContext, RunController};
//! use stride_coach::speech::LogSpeech;
//! use stride_coach::storage::{memory::InMemoryStore, SessionRepository};
//!
//! # async fn example() -> Result<(), stride_coach::errors::AppError> {
//! let config = AppConfig::from_env()?;
//! let store = Arc::new(InMemoryStore::new());
//! let finalizer = SessionFinalizer::new(
//!     Arc::new(OpenElevationClient::new(&config.elevation)),
//!     SessionRepository::new(store),
//!     FinalizerConfig::default(),
//! );
//! let source = ReplaySource::from_path("track.json".as_ref(), 10.0).await?;
//!
//! let run = RunController::spawn(RunContext {
//!     telemetry: config.telemetry,
//!     cues: config.cues,
//!     settings: Default::default(),
//!     source: Box::new(source),
//!     speech: Arc::new(LogSpeech),
//!     coaching: None,
//!     finalizer,
//! });
//! run.start(None).await?;
//! let session = run.stop().await?;
//! # Ok(())
//! # }
//! ```

/// Coaching cues from snapshots and the persisted coach chat
pub mod coach;

/// Configuration loaded from environment variables
pub mod config;

/// Cue rate limiting, pace coaching and spoken phrases
pub mod cues;

/// Terrain elevation lookup used at finalization
pub mod elevation;

/// Unified error handling
pub mod errors;

/// Session export formats
pub mod export;

/// Stopped run to persisted session
pub mod finalizer;

/// Coaching text provider abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Async runtime owning one run
pub mod runtime;

/// Speech output port
pub mod speech;

/// Key-value persistence port and repositories
pub mod storage;

/// Run state machine
pub mod tracker;

/// Shared HTTP clients
pub mod utils;

pub use stride_core::{constants, formatters, models};
pub use stride_telemetry::TelemetryConfig;
