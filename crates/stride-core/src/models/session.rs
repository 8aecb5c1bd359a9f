// ABOUTME: Finalized run record persisted at stop and read by history and export
// ABOUTME: Immutable after creation; derived average pace is computed once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Goal, TrackPoint};
use crate::constants::units::METERS_PER_KM;

/// Finalized, persisted record of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Total distance in meters
    pub distance_m: f64,
    /// Time spent in the running phase, in seconds
    pub moving_time_s: u64,
    /// Average pace in seconds per kilometer (0 when undefined)
    pub average_pace_sec_per_km: f64,
    /// Accepted path, with corrected elevations where available
    pub path: Vec<TrackPoint>,
    /// Elapsed moving time of each completed kilometer, in seconds
    pub splits: Vec<u64>,
    /// Total ascent in meters
    pub elevation_gain_m: f64,
    /// Goal the run was started with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Average pace for a distance and moving time, 0 when either is zero
    #[must_use]
    pub fn average_pace(distance_m: f64, moving_time_s: u64) -> f64 {
        if distance_m > 0.0 && moving_time_s > 0 {
            moving_time_s as f64 * METERS_PER_KM / distance_m
        } else {
            0.0
        }
    }

    /// Average speed in m/s, if defined
    #[must_use]
    pub fn average_speed(&self) -> Option<f64> {
        (self.distance_m > 0.0 && self.moving_time_s > 0)
            .then(|| self.distance_m / self.moving_time_s as f64)
    }

    /// Distance in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / METERS_PER_KM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_pace() {
        // 5 km in 25 minutes = 300 s/km
        assert!((Session::average_pace(5_000.0, 1_500) - 300.0).abs() < 1e-9);
        assert!(Session::average_pace(0.0, 1_500).abs() < f64::EPSILON);
        assert!(Session::average_pace(5_000.0, 0).abs() < f64::EPSILON);
    }
}
