// ABOUTME: Runner preferences persisted across sessions
// ABOUTME: Target pace, auto-pause, voice cues and race information
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::session::{DEFAULT_RACE_DISTANCE_KM, DEFAULT_TARGET_PACE_SECS};

/// Persisted runner preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Target pace in seconds per kilometer
    pub target_pace_sec_per_km: u32,
    /// Pause and resume automatically based on smoothed speed
    pub auto_pause: bool,
    /// Speak coaching cues
    pub voice_cues: bool,
    /// Date of the target race
    pub race_date: Option<NaiveDate>,
    /// Distance of the target race in kilometers
    pub race_distance_km: f64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            target_pace_sec_per_km: DEFAULT_TARGET_PACE_SECS,
            auto_pause: true,
            voice_cues: true,
            race_date: None,
            race_distance_km: DEFAULT_RACE_DISTANCE_KM,
        }
    }
}
