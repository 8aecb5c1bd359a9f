// ABOUTME: Coaching cue rate limiting, pace deviation coaching and spoken phrases
// ABOUTME: Pure timing decisions; the runtime supplies the clock and distance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Cue Scheduling
//!
//! [`CueScheduler`] decides when a coaching-text request may be sent: at
//! least `min_interval` since the last one, or at least `distance_trigger_m`
//! covered since then, whichever comes first. It is polled on a fixed cadence
//! rather than per sample, which bounds the request rate.
//!
//! [`PaceCoach`] compares the smoothed pace against the target pace and
//! produces a directional correction when the gap exceeds the tolerance.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stride_core::formatters::{format_clock, format_pace_seconds, pace_seconds_per_km};
use tracing::debug;

use crate::config::CueConfig;

/// Rate limiter for coaching-text requests
#[derive(Debug, Clone)]
pub struct CueScheduler {
    min_interval_ms: u64,
    distance_trigger_m: f64,
    last_fire_ms: u64,
    last_fire_distance_m: f64,
}

impl CueScheduler {
    /// Create a scheduler armed at time zero and distance zero
    #[must_use]
    pub fn new(min_interval: Duration, distance_trigger_m: f64) -> Self {
        Self {
            min_interval_ms: duration_ms(min_interval),
            distance_trigger_m,
            last_fire_ms: 0,
            last_fire_distance_m: 0.0,
        }
    }

    /// Create a scheduler from cue configuration
    #[must_use]
    pub fn from_config(config: &CueConfig) -> Self {
        Self::new(config.min_interval, config.distance_trigger_m)
    }

    /// Reset the reference point, typically at run start
    pub fn arm(&mut self, now_ms: u64, distance_m: f64) {
        self.last_fire_ms = now_ms;
        self.last_fire_distance_m = distance_m;
    }

    /// Whether a cue should fire now; firing moves the reference point
    pub fn poll(&mut self, now_ms: u64, distance_m: f64) -> bool {
        let elapsed_ms = now_ms.saturating_sub(self.last_fire_ms);
        let covered_m = distance_m - self.last_fire_distance_m;
        let due = elapsed_ms >= self.min_interval_ms || covered_m >= self.distance_trigger_m;
        if due {
            debug!(elapsed_ms, covered_m, "Coaching cue due");
            self.arm(now_ms, distance_m);
        }
        due
    }
}

/// Direction of a pace correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceCorrection {
    /// Running slower than target
    SpeedUp,
    /// Running faster than target
    EaseOff,
}

/// A pace correction to be spoken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceCue {
    /// Which way to correct
    pub correction: PaceCorrection,
    /// Current pace (seconds per km)
    pub pace_sec_per_km: f64,
    /// Current minus target pace (seconds per km)
    pub gap_secs: f64,
}

impl PaceCue {
    /// Spoken form, e.g. "05:10 per kilometer. Pick it up slightly to reach your target."
    #[must_use]
    pub fn phrase(&self) -> String {
        let advice = match self.correction {
            PaceCorrection::SpeedUp => "Pick it up slightly to reach your target.",
            PaceCorrection::EaseOff => "Ease off a little, you are running too fast.",
        };
        format!(
            "{} per kilometer. {advice}",
            format_pace_seconds(self.pace_sec_per_km)
        )
    }
}

/// Periodic pace deviation check
#[derive(Debug, Clone)]
pub struct PaceCoach {
    interval_ms: u64,
    tolerance_secs: f64,
    last_check_ms: Option<u64>,
}

impl PaceCoach {
    /// Create a pace coach
    #[must_use]
    pub fn new(interval: Duration, tolerance_secs: f64) -> Self {
        Self {
            interval_ms: duration_ms(interval),
            tolerance_secs,
            last_check_ms: None,
        }
    }

    /// Create a pace coach from cue configuration
    #[must_use]
    pub fn from_config(config: &CueConfig) -> Self {
        Self::new(config.pace_check_interval, config.pace_tolerance_secs)
    }

    /// Check the pace if the interval has elapsed since the previous check
    ///
    /// The check window restarts even when no pace is available yet.
    pub fn check(
        &mut self,
        now_ms: u64,
        smoothed_speed_mps: f64,
        target_pace_sec_per_km: u32,
    ) -> Option<PaceCue> {
        if let Some(last) = self.last_check_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return None;
            }
        }
        self.last_check_ms = Some(now_ms);

        let pace = pace_seconds_per_km(smoothed_speed_mps)?;
        let gap_secs = pace - f64::from(target_pace_sec_per_km);
        if gap_secs.abs() <= self.tolerance_secs {
            return None;
        }
        let correction = if gap_secs > 0.0 {
            PaceCorrection::SpeedUp
        } else {
            PaceCorrection::EaseOff
        };
        Some(PaceCue {
            correction,
            pace_sec_per_km: pace,
            gap_secs,
        })
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Fixed spoken phrases
pub mod phrases {
    use super::format_clock;

    /// Spoken when a run starts
    pub const RUN_STARTED: &str = "Starting run. Have a great session!";
    /// Spoken when a run pauses
    pub const RUN_PAUSED: &str = "Pause activated.";
    /// Spoken when a run resumes
    pub const RUN_RESUMED: &str = "Back to training.";
    /// Spoken when a session is saved
    pub const RUN_SAVED: &str = "Run saved. Great work!";

    /// Spoken when a kilometer split is recorded
    #[must_use]
    pub fn split(number: usize, seconds: u64) -> String {
        format!("Kilometer {number}. Split {}.", format_clock(seconds))
    }
}
