// ABOUTME: Read-only view of a run for coaching prompts, CLI progress and tests
// ABOUTME: Derives current and average pace plus goal progress from the run state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use stride_core::formatters::{format_clock, format_pace_seconds, pace_seconds_per_km};
use stride_core::models::{Goal, Session};

use super::state::{RunPhase, RunState};

/// Point-in-time metrics of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Current phase
    pub phase: RunPhase,
    /// Total distance (meters)
    pub distance_m: f64,
    /// Moving time (seconds)
    pub moving_time_s: u64,
    /// Smoothed speed (m/s)
    pub current_speed_mps: f64,
    /// Pace from smoothed speed (seconds per km)
    pub current_pace_sec_per_km: Option<f64>,
    /// Pace over the whole run (seconds per km)
    pub average_pace_sec_per_km: Option<f64>,
    /// Total ascent (meters)
    pub elevation_gain_m: f64,
    /// Most recent kilometer split (seconds)
    pub last_split_s: Option<u64>,
    /// Number of completed kilometers
    pub splits_completed: usize,
    /// Goal of the run
    pub goal: Option<Goal>,
    /// Fraction of the goal completed
    pub goal_progress: Option<f64>,
    /// Accepted points in the path
    pub point_count: usize,
}

impl RunSnapshot {
    /// Capture the current state
    #[must_use]
    pub fn capture(state: &RunState) -> Self {
        let distance_m = state.distance_m();
        let average = Session::average_pace(distance_m, state.moving_time_s);
        Self {
            phase: state.phase,
            distance_m,
            moving_time_s: state.moving_time_s,
            current_speed_mps: state.smoothed_speed_mps,
            current_pace_sec_per_km: pace_seconds_per_km(state.smoothed_speed_mps),
            average_pace_sec_per_km: (average > 0.0).then_some(average),
            elevation_gain_m: state.elevation_gain_m(),
            last_split_s: state.splits.last().copied(),
            splits_completed: state.splits.len(),
            goal: state.goal,
            goal_progress: state
                .goal
                .map(|goal| goal.progress(distance_m, state.moving_time_s)),
            point_count: state.path.len(),
        }
    }

    /// One-line summary used as the coaching prompt payload
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "distance={:.2}km, time={}, current_pace={}, average_pace={}, elevation_gain={}m",
            self.distance_m / 1000.0,
            format_clock(self.moving_time_s),
            pace_text(self.current_pace_sec_per_km),
            pace_text(self.average_pace_sec_per_km),
            self.elevation_gain_m.round(),
        );
        if let Some(split) = self.last_split_s {
            text.push_str(&format!(
                ", last_split=km{}:{}",
                self.splits_completed,
                format_clock(split)
            ));
        }
        match self.goal {
            Some(Goal::Distance {
                target_km,
                target_pace_sec_per_km,
            }) => {
                text.push_str(&format!(", goal={target_km}km"));
                if let Some(pace) = target_pace_sec_per_km {
                    text.push_str(&format!(" at {}", format_pace_seconds(f64::from(pace))));
                }
            }
            Some(Goal::Duration { target_seconds }) => {
                text.push_str(&format!(", goal={}", format_clock(target_seconds)));
            }
            None => {}
        }
        if let Some(progress) = self.goal_progress {
            text.push_str(&format!(" ({:.0}% done)", progress * 100.0));
        }
        text
    }
}

fn pace_text(pace: Option<f64>) -> String {
    pace.map_or_else(
        || stride_core::formatters::UNKNOWN_PACE.to_owned(),
        format_pace_seconds,
    )
}
