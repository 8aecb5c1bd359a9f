// ABOUTME: Cumulative distance and elevation gain integration over accepted points
// ABOUTME: Also provides whole-path recomputation used when finalizing a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use stride_core::models::TrackPoint;

use crate::config::TelemetryConfig;
use crate::geo::distance_between;

/// Contribution of one segment to the running totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentDelta {
    /// Horizontal great-circle distance (meters)
    pub distance_m: f64,
    /// Ascent counted towards gain, zero for descents and noise (meters)
    pub ascent_m: f64,
}

/// Running totals for one run.
///
/// Both totals only ever grow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    distance_m: f64,
    elevation_gain_m: f64,
    min_ascent_m: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl Accumulator {
    /// Empty accumulator using the configured ascent threshold
    #[must_use]
    pub const fn from_config(config: &TelemetryConfig) -> Self {
        Self {
            distance_m: 0.0,
            elevation_gain_m: 0.0,
            min_ascent_m: config.min_ascent_m,
        }
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Total elevation gain in meters
    #[must_use]
    pub const fn elevation_gain_m(&self) -> f64 {
        self.elevation_gain_m
    }

    /// Measure a segment without touching the totals
    #[must_use]
    pub fn measure(&self, prev: &TrackPoint, next: &TrackPoint) -> SegmentDelta {
        SegmentDelta {
            distance_m: distance_between(prev, next),
            ascent_m: ascent(prev, next, self.min_ascent_m),
        }
    }

    /// Integrate one accepted segment into the totals
    pub fn add_segment(&mut self, prev: &TrackPoint, next: &TrackPoint) -> SegmentDelta {
        let delta = self.measure(prev, next);
        self.distance_m += delta.distance_m;
        self.elevation_gain_m += delta.ascent_m;
        delta
    }

    /// Zero both totals
    pub fn reset(&mut self) {
        self.distance_m = 0.0;
        self.elevation_gain_m = 0.0;
    }
}

fn ascent(prev: &TrackPoint, next: &TrackPoint, min_ascent_m: f64) -> f64 {
    match (prev.altitude_m, next.altitude_m) {
        (Some(from), Some(to)) if to - from > min_ascent_m => to - from,
        _ => 0.0,
    }
}

/// Sum of haversine distances between consecutive points
#[must_use]
pub fn path_distance(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_between(&pair[0], &pair[1]))
        .sum()
}

/// Elevation gain over a whole path using the ascent threshold.
///
/// Only consecutive pairs where both points carry an altitude contribute.
#[must_use]
pub fn recompute_elevation_gain(points: &[TrackPoint], min_ascent_m: f64) -> f64 {
    points
        .windows(2)
        .map(|pair| ascent(&pair[0], &pair[1], min_ascent_m))
        .sum()
}
