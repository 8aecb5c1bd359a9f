// ABOUTME: Run phase, pause reason and the mutable run state aggregate
// ABOUTME: Owned exclusively by the run tracker for the lifetime of one run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use stride_core::models::{Goal, TrackPoint};
use stride_telemetry::Accumulator;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run started yet
    Idle,
    /// Accumulating distance and moving time
    Running,
    /// Moving-time clock stopped, no path accumulation
    Paused,
    /// Terminal; the run has been handed to the finalizer
    Stopped,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Why a run is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Runner asked for it; acquisition is torn down
    Manual,
    /// Smoothed speed fell below the pause threshold; acquisition stays live
    Auto,
}

/// Mutable aggregate for one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Current phase
    pub phase: RunPhase,
    /// Reason for the current pause, `None` unless paused
    pub pause_reason: Option<PauseReason>,
    /// Accepted points in time order
    pub path: Vec<TrackPoint>,
    /// Distance and elevation gain totals
    pub totals: Accumulator,
    /// Seconds spent in the running phase
    pub moving_time_s: u64,
    /// Exponentially smoothed speed (m/s)
    pub smoothed_speed_mps: f64,
    /// Moving time of each completed kilometer (seconds)
    pub splits: Vec<u64>,
    /// Target the run was started with
    pub goal: Option<Goal>,
    /// Latest sample that passed the filter, running or paused
    pub last_accepted: Option<TrackPoint>,
    /// Next running point opens a new path segment
    pub segment_pending: bool,
    /// Whether location acquisition should currently be live
    pub acquiring: bool,
}

impl RunState {
    /// Fresh state for a run that has not started
    #[must_use]
    pub fn idle(totals: Accumulator) -> Self {
        Self {
            phase: RunPhase::Idle,
            pause_reason: None,
            path: Vec::new(),
            totals,
            moving_time_s: 0,
            smoothed_speed_mps: 0.0,
            splits: Vec::new(),
            goal: None,
            last_accepted: None,
            segment_pending: false,
            acquiring: false,
        }
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_m(&self) -> f64 {
        self.totals.distance_m()
    }

    /// Total elevation gain in meters
    #[must_use]
    pub const fn elevation_gain_m(&self) -> f64 {
        self.totals.elevation_gain_m()
    }
}
