// ABOUTME: Turns a stopped run into a persisted session
// ABOUTME: Applies terrain elevation corrections, recomputes gain and prepends to history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Session Finalizer
//!
//! Runs shorter than 50 m or with fewer than 5 accepted points are dropped
//! before any network call. Elevation correction is best effort: when the
//! lookup returns nothing usable the incrementally computed gain is kept.

use chrono::{Local, Utc};
use std::sync::Arc;
use stride_core::constants::session::{MIN_SAVE_DISTANCE_M, MIN_SAVE_POINTS};
use stride_core::models::{Session, TrackPoint};
use stride_telemetry::recompute_elevation_gain;
use tracing::{debug, info};
use uuid::Uuid;

use crate::elevation::{fetch_elevations, ElevationProvider};
use crate::errors::AppResult;
use crate::storage::SessionRepository;
use crate::tracker::FinishedRun;

/// Persistence thresholds and elevation settings for finalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizerConfig {
    /// Minimum distance for a run to be saved (meters)
    pub min_distance_m: f64,
    /// Minimum accepted points for a run to be saved
    pub min_points: usize,
    /// Points per elevation lookup
    pub elevation_batch_size: usize,
    /// Ascent threshold used when recomputing gain (meters)
    pub min_ascent_m: f64,
}

impl Default for FinalizerConfig {
    fn default() -> Self {
        Self {
            min_distance_m: MIN_SAVE_DISTANCE_M,
            min_points: MIN_SAVE_POINTS,
            elevation_batch_size: stride_core::constants::elevation::MAX_BATCH_SIZE,
            min_ascent_m: stride_core::constants::accumulator::MIN_ASCENT_M,
        }
    }
}

/// Builds and persists sessions from finished runs
#[derive(Clone)]
pub struct SessionFinalizer {
    elevation: Arc<dyn ElevationProvider>,
    sessions: SessionRepository,
    config: FinalizerConfig,
}

impl SessionFinalizer {
    /// Create a finalizer
    #[must_use]
    pub fn new(
        elevation: Arc<dyn ElevationProvider>,
        sessions: SessionRepository,
        config: FinalizerConfig,
    ) -> Self {
        Self {
            elevation,
            sessions,
            config,
        }
    }

    /// Whether a run is long enough to keep
    #[must_use]
    pub fn should_persist(&self, run: &FinishedRun) -> bool {
        run.distance_m >= self.config.min_distance_m && run.path.len() >= self.config.min_points
    }

    /// Finalize a run; `Ok(None)` when the run was too short to keep
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted. Elevation
    /// failures never surface here.
    pub async fn finalize(&self, run: FinishedRun) -> AppResult<Option<Session>> {
        if !self.should_persist(&run) {
            info!(
                distance_m = run.distance_m,
                points = run.path.len(),
                "Run too short, not saved"
            );
            return Ok(None);
        }

        let session = self.build_session(run).await;
        self.sessions.prepend(&session).await?;
        Ok(Some(session))
    }

    /// Apply elevation corrections and assemble the session without saving it
    pub async fn build_session(&self, run: FinishedRun) -> Session {
        let FinishedRun {
            mut path,
            distance_m,
            moving_time_s,
            splits,
            elevation_gain_m,
            goal,
        } = run;

        let corrections = fetch_elevations(
            self.elevation.as_ref(),
            &path,
            self.config.elevation_batch_size,
        )
        .await;
        let corrected = apply_elevations(&mut path, &corrections);

        let elevation_gain_m = if corrected > 0 {
            let recomputed = recompute_elevation_gain(&path, self.config.min_ascent_m);
            debug!(
                corrected,
                incremental_m = elevation_gain_m,
                recomputed_m = recomputed,
                "Elevation gain recomputed"
            );
            recomputed
        } else {
            debug!("No elevation corrections, keeping incremental gain");
            elevation_gain_m
        };

        let now = Local::now();
        Session {
            id: Uuid::new_v4(),
            name: format!("Run {}", now.format("%Y-%m-%d %H:%M")),
            distance_m,
            moving_time_s,
            average_pace_sec_per_km: Session::average_pace(distance_m, moving_time_s),
            path,
            splits,
            elevation_gain_m,
            goal,
            created_at: now.with_timezone(&Utc),
        }
    }
}

/// Replace point altitudes with known corrections; returns how many changed
pub fn apply_elevations(path: &mut [TrackPoint], elevations: &[Option<f64>]) -> usize {
    path.iter_mut()
        .zip(elevations)
        .filter_map(|(point, elevation)| elevation.map(|e| (point, e)))
        .map(|(point, elevation)| point.altitude_m = Some(elevation))
        .count()
}
