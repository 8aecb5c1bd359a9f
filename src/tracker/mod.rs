// ABOUTME: Run session state machine composing filter, fusion, accumulation and split detection
// ABOUTME: Handles start/pause/resume/stop commands, clock ticks and automatic pause/resume
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Run Tracker
//!
//! [`RunTracker`] owns the [`RunState`] of one run and is the only code that
//! mutates it. Every accepted sample runs the same synchronous cascade:
//! filter, then speed fusion, then distance/elevation accumulation, then
//! split detection, then the auto-pause check.
//!
//! The tracker performs no I/O. Side effects it needs (starting or tearing
//! down acquisition, announcing splits) are queued as [`TrackerEvent`]s and
//! collected with [`RunTracker::drain_events`].
//!
//! ## Pauses and segments
//!
//! A manual pause tears down acquisition. An automatic pause keeps it live so
//! the tracker can observe the runner speeding up again: samples accepted
//! while auto-paused update the smoothed speed only. Every resume opens a new
//! path segment, so the distance covered while paused is never counted.

mod events;
mod snapshot;
mod state;

pub use events::{IgnoreReason, SampleOutcome, TrackerEvent, TransitionCause};
pub use snapshot::RunSnapshot;
pub use state::{PauseReason, RunPhase, RunState};

use std::mem;
use stride_core::errors::{AppError, AppResult};
use stride_core::models::{GeoSample, Goal, TrackPoint};
use stride_telemetry::{Accumulator, SampleFilter, SpeedFusion, SplitDetector, TelemetryConfig};
use tracing::{debug, info};

/// Everything the finalizer needs from a stopped run
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRun {
    /// Accepted path
    pub path: Vec<TrackPoint>,
    /// Total distance (meters)
    pub distance_m: f64,
    /// Moving time (seconds)
    pub moving_time_s: u64,
    /// Kilometer splits (seconds)
    pub splits: Vec<u64>,
    /// Incrementally computed elevation gain (meters)
    pub elevation_gain_m: f64,
    /// Goal the run was started with
    pub goal: Option<Goal>,
}

/// Run session state machine
pub struct RunTracker {
    config: TelemetryConfig,
    filter: SampleFilter,
    fusion: SpeedFusion,
    splits: SplitDetector,
    auto_pause: bool,
    state: RunState,
    events: Vec<TrackerEvent>,
}

impl RunTracker {
    /// Create an idle tracker
    #[must_use]
    pub fn new(config: TelemetryConfig, auto_pause: bool) -> Self {
        Self {
            filter: SampleFilter::from_config(&config),
            fusion: SpeedFusion::from_config(&config),
            splits: SplitDetector::from_config(&config),
            state: RunState::idle(Accumulator::from_config(&config)),
            config,
            auto_pause,
            events: Vec::new(),
        }
    }

    /// Current state, read-only
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Telemetry thresholds in use
    #[must_use]
    pub const fn config(&self) -> TelemetryConfig {
        self.config
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.state.phase
    }

    /// Whether automatic pause/resume is enabled
    #[must_use]
    pub const fn auto_pause_enabled(&self) -> bool {
        self.auto_pause
    }

    /// Point-in-time metrics
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot::capture(&self.state)
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<TrackerEvent> {
        mem::take(&mut self.events)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Start a run, resetting every total
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the tracker is idle.
    pub fn start(&mut self, goal: Option<Goal>) -> AppResult<()> {
        if self.state.phase != RunPhase::Idle {
            return Err(invalid_command("start", self.state.phase));
        }
        self.state = RunState::idle(Accumulator::from_config(&self.config));
        self.state.goal = goal;
        self.transition(RunPhase::Running, TransitionCause::Command);
        self.set_acquisition(true);
        Ok(())
    }

    /// Pause on the runner's request
    ///
    /// An automatic pause can be turned into a manual one, which tears down
    /// acquisition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless running or auto-paused.
    pub fn pause(&mut self) -> AppResult<()> {
        match (self.state.phase, self.state.pause_reason) {
            (RunPhase::Running, _) => {
                self.state.pause_reason = Some(PauseReason::Manual);
                self.transition(RunPhase::Paused, TransitionCause::Command);
            }
            (RunPhase::Paused, Some(PauseReason::Auto)) => {
                self.state.pause_reason = Some(PauseReason::Manual);
                info!("Automatic pause converted to manual pause");
            }
            (phase, _) => return Err(invalid_command("pause", phase)),
        }
        self.set_acquisition(false);
        Ok(())
    }

    /// Resume on the runner's request
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless paused.
    pub fn resume(&mut self) -> AppResult<()> {
        if self.state.phase != RunPhase::Paused {
            return Err(invalid_command("resume", self.state.phase));
        }
        self.resume_with(TransitionCause::Command);
        self.set_acquisition(true);
        Ok(())
    }

    /// Advance the moving-time clock by one second if running
    ///
    /// Returns whether the clock advanced.
    pub fn tick(&mut self) -> bool {
        if self.state.phase == RunPhase::Running {
            self.state.moving_time_s += 1;
            true
        } else {
            false
        }
    }

    /// Stop the run and hand over its data
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless running or paused.
    pub fn stop(&mut self) -> AppResult<FinishedRun> {
        if !matches!(self.state.phase, RunPhase::Running | RunPhase::Paused) {
            return Err(invalid_command("stop", self.state.phase));
        }
        self.set_acquisition(false);
        self.state.pause_reason = None;
        self.transition(RunPhase::Stopped, TransitionCause::Command);

        let finished = FinishedRun {
            path: self.state.path.clone(),
            distance_m: self.state.distance_m(),
            moving_time_s: self.state.moving_time_s,
            splits: self.state.splits.clone(),
            elevation_gain_m: self.state.elevation_gain_m(),
            goal: self.state.goal,
        };
        info!(
            distance_m = finished.distance_m,
            moving_time_s = finished.moving_time_s,
            points = finished.path.len(),
            splits = finished.splits.len(),
            "Run stopped"
        );
        Ok(finished)
    }

    // ========================================================================
    // Sample Pipeline
    // ========================================================================

    /// Offer one raw sample to the run
    pub fn handle_sample(&mut self, sample: GeoSample) -> SampleOutcome {
        if let Some(reason) = self.precheck(&sample) {
            debug!(?reason, ts = sample.timestamp_ms, "Sample ignored");
            return SampleOutcome::Ignored { reason };
        }

        if let Err(reason) = self.filter.evaluate(&sample, self.state.last_accepted.as_ref()) {
            debug!(%reason, ts = sample.timestamp_ms, "Sample rejected");
            return SampleOutcome::Rejected { reason };
        }

        match self.state.phase {
            RunPhase::Running => self.accept_running(sample),
            RunPhase::Paused => self.accept_paused(sample),
            RunPhase::Idle | RunPhase::Stopped => {}
        }
        SampleOutcome::Accepted
    }

    fn precheck(&self, sample: &GeoSample) -> Option<IgnoreReason> {
        match (self.state.phase, self.state.pause_reason) {
            (RunPhase::Idle | RunPhase::Stopped, _) => return Some(IgnoreReason::NotTracking),
            (RunPhase::Paused, Some(PauseReason::Manual)) => return Some(IgnoreReason::Paused),
            _ => {}
        }
        if !sample.is_well_formed() {
            return Some(IgnoreReason::Malformed);
        }
        match self.state.last_accepted {
            Some(last) if sample.timestamp_ms <= last.timestamp_ms => {
                Some(IgnoreReason::OutOfOrder)
            }
            _ => None,
        }
    }

    fn accept_running(&mut self, sample: GeoSample) {
        let previous = self.state.last_accepted.replace(sample);
        let continues_segment = !mem::take(&mut self.state.segment_pending);

        let Some(prev) = previous.filter(|_| continues_segment) else {
            // First point of the run or of a resumed segment
            self.state.path.push(sample);
            return;
        };

        self.update_speed(&prev, &sample);
        self.state.totals.add_segment(&prev, &sample);
        self.state.path.push(sample);

        let recorded = self.splits.detect(
            self.state.distance_m(),
            self.state.moving_time_s,
            &mut self.state.splits,
        );
        for split in recorded {
            info!(number = split.number, seconds = split.seconds, "Split recorded");
            self.events.push(TrackerEvent::SplitRecorded(split));
        }

        if self.auto_pause && self.state.smoothed_speed_mps < self.config.pause_below_mps {
            self.state.pause_reason = Some(PauseReason::Auto);
            self.transition(RunPhase::Paused, TransitionCause::AutoPause);
        }
    }

    fn accept_paused(&mut self, sample: GeoSample) {
        let previous = self.state.last_accepted.replace(sample);
        if let Some(prev) = previous {
            self.update_speed(&prev, &sample);
        }

        if self.auto_pause && self.state.smoothed_speed_mps >= self.config.resume_at_mps {
            self.resume_with(TransitionCause::AutoResume);
            // The sample that triggered the resume starts the new segment
            self.state.segment_pending = false;
            self.state.path.push(sample);
        }
    }

    fn update_speed(&mut self, prev: &TrackPoint, next: &TrackPoint) {
        let estimate = self.fusion.fuse(prev, next, self.state.smoothed_speed_mps);
        self.state.smoothed_speed_mps = estimate.smoothed_mps;
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn resume_with(&mut self, cause: TransitionCause) {
        self.state.pause_reason = None;
        self.state.segment_pending = true;
        self.transition(RunPhase::Running, cause);
    }

    fn transition(&mut self, to: RunPhase, cause: TransitionCause) {
        let from = self.state.phase;
        self.state.phase = to;
        info!(
            %from,
            %to,
            ?cause,
            distance_m = self.state.distance_m(),
            speed_mps = self.state.smoothed_speed_mps,
            "Run phase changed"
        );
        self.events
            .push(TrackerEvent::PhaseChanged { from, to, cause });
    }

    fn set_acquisition(&mut self, active: bool) {
        if self.state.acquiring != active {
            self.state.acquiring = active;
            self.events.push(TrackerEvent::AcquisitionChanged { active });
        }
    }
}

fn invalid_command(command: &str, phase: RunPhase) -> AppError {
    AppError::invalid_state(format!("cannot {command} while {phase}"))
}
