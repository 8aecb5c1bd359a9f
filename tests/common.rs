// ABOUTME: Shared test utilities for stride_coach integration tests
// ABOUTME: Track builders, recording speech, scripted coaching and elevation doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `stride_coach`
//!
//! Provides synthetic tracks and in-process doubles for the speech,
//! coaching, elevation and location ports so integration tests never touch
//! the network or a real sensor.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use stride_coach::elevation::ElevationProvider;
use stride_coach::errors::{AppError, AppResult};
use stride_coach::finalizer::{FinalizerConfig, SessionFinalizer};
use stride_coach::llm::{ChatRequest, ChatResponse, LlmProvider};
use stride_coach::models::{GeoSample, TrackPoint};
use stride_coach::runtime::{LocationSource, SampleSink};
use stride_coach::speech::SpeechSink;
use stride_coach::storage::memory::InMemoryStore;
use stride_coach::storage::{KeyValueStore, SessionRepository};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Synthetic tracks
// ============================================================================

/// Meters per degree of latitude on the haversine sphere
pub const METERS_PER_DEG_LAT: f64 = 111_194.926_644_558_7;

/// Latitude reached after moving `meters` due north from the equator
pub fn north(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

/// Sample `meters` north of the origin at `timestamp_ms`, with good accuracy
pub fn sample_at(meters: f64, timestamp_ms: i64) -> GeoSample {
    GeoSample::new(north(meters), 0.0, timestamp_ms).with_accuracy(5.0)
}

/// Straight northbound track: `count` samples, `step_m` apart, `step_ms` apart
pub fn straight_track(count: usize, step_m: f64, step_ms: i64) -> Vec<GeoSample> {
    (0..count)
        .map(|i| sample_at(i as f64 * step_m, i as i64 * step_ms))
        .collect()
}

/// Track points carrying the given altitudes, 20 m apart
pub fn climb(altitudes: &[f64]) -> Vec<TrackPoint> {
    altitudes
        .iter()
        .enumerate()
        .map(|(i, &alt)| sample_at(i as f64 * 20.0, i as i64 * 5_000).with_altitude(alt))
        .collect()
}

// ============================================================================
// Speech
// ============================================================================

/// Speech sink that records every utterance
#[derive(Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn said(&self, text: &str) -> bool {
        self.spoken.lock().unwrap().iter().any(|s| s == text)
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_owned());
    }
}

// ============================================================================
// Coaching provider
// ============================================================================

/// How the scripted provider answers
#[derive(Debug, Clone)]
pub enum Script {
    /// Always reply with this text
    Reply(String),
    /// Fail as if the endpoint were down
    Unavailable,
    /// Fail as if no credential were configured
    MissingKey,
}

/// Provider double that answers from a script and records requests
pub struct ScriptedLlm {
    script: Script,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Script::Reply(text.to_owned()))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Script::Unavailable => Err(AppError::external_unavailable("scripted", "outage")),
            Script::MissingKey => Err(AppError::config_missing("no coaching credential")),
        }
    }
}

// ============================================================================
// Elevation provider
// ============================================================================

/// Elevation double: answers every batch from a function of the batch, or fails
pub struct StubElevation {
    answer: Box<dyn Fn(&[TrackPoint]) -> AppResult<Vec<Option<f64>>> + Send + Sync>,
    batches: Mutex<Vec<usize>>,
}

impl StubElevation {
    pub fn new(
        answer: impl Fn(&[TrackPoint]) -> AppResult<Vec<Option<f64>>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            answer: Box::new(answer),
            batches: Mutex::new(Vec::new()),
        })
    }

    /// Same elevation for every point
    pub fn constant(elevation: f64) -> Arc<Self> {
        Self::new(move |batch| Ok(vec![Some(elevation); batch.len()]))
    }

    /// Fixed per-point elevations for a single batch
    pub fn fixed(values: Vec<Option<f64>>) -> Arc<Self> {
        Self::new(move |_| Ok(values.clone()))
    }

    /// Every lookup fails
    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(AppError::external_unavailable("elevation", "service down")))
    }

    /// Sizes of the batches requested so far
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ElevationProvider for StubElevation {
    async fn lookup(&self, points: &[TrackPoint]) -> AppResult<Vec<Option<f64>>> {
        self.batches.lock().unwrap().push(points.len());
        (self.answer)(points)
    }
}

// ============================================================================
// Location source
// ============================================================================

/// Location source driven by the test through [`ChannelSource::push`]
#[derive(Clone, Default)]
pub struct ChannelSource {
    sink: Arc<Mutex<Option<SampleSink>>>,
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    fail_start: bool,
}

impl ChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose acquisition never starts
    pub fn unavailable() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    /// Sink handed over by the most recent start, even after a stop
    pub fn current_sink(&self) -> Option<SampleSink> {
        self.sink.lock().unwrap().clone()
    }

    /// Push a sample through the current sink
    pub async fn push(&self, sample: GeoSample) -> bool {
        match self.current_sink() {
            Some(sink) => sink.send(sample).await,
            None => false,
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationSource for ChannelSource {
    async fn start(&mut self, sink: SampleSink) -> AppResult<()> {
        if self.fail_start {
            return Err(AppError::sensor_unavailable("location permission denied"));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    async fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// In-memory store shared behind the storage port
pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(InMemoryStore::new())
}

/// Finalizer over the given store with default thresholds
pub fn finalizer(
    elevation: Arc<dyn ElevationProvider>,
    store: Arc<dyn KeyValueStore>,
) -> SessionFinalizer {
    SessionFinalizer::new(
        elevation,
        SessionRepository::new(store),
        FinalizerConfig::default(),
    )
}
