// ABOUTME: Optional run target: distance with optional pace, or duration
// ABOUTME: Provides progress fraction and goal pace for the pace coach
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};

use crate::constants::units::METERS_PER_KM;

/// Target for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goal {
    /// Cover a distance, optionally at a target pace
    Distance {
        /// Target distance in kilometers
        target_km: f64,
        /// Target pace in seconds per kilometer
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_pace_sec_per_km: Option<u32>,
    },
    /// Keep moving for a duration
    Duration {
        /// Target moving time in seconds
        target_seconds: u64,
    },
}

impl Goal {
    /// Fraction of the goal completed, clamped to `[0, 1]`
    #[must_use]
    pub fn progress(&self, distance_m: f64, moving_time_s: u64) -> f64 {
        let fraction = match *self {
            Self::Distance { target_km, .. } if target_km > 0.0 => {
                distance_m / (target_km * METERS_PER_KM)
            }
            Self::Duration { target_seconds } if target_seconds > 0 => {
                moving_time_s as f64 / target_seconds as f64
            }
            _ => 0.0,
        };
        if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Target pace carried by the goal, if any
    #[must_use]
    pub const fn target_pace(&self) -> Option<u32> {
        match *self {
            Self::Distance {
                target_pace_sec_per_km,
                ..
            } => target_pace_sec_per_km,
            Self::Duration { .. } => None,
        }
    }
}
