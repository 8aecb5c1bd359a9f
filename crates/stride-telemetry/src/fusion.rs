// ABOUTME: Speed fusion blending segment-derived and device-reported speed
// ABOUTME: Clamps to a running sanity ceiling and applies exponential smoothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use stride_core::constants::units::MILLIS_PER_SECOND;
use stride_core::models::TrackPoint;

use crate::config::TelemetryConfig;
use crate::geo::distance_between;

/// Intermediate and final values of one fusion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimate {
    /// Distance over floored time delta (m/s)
    pub segment_mps: f64,
    /// Weighted blend with device speed, before clamping (m/s)
    pub fused_mps: f64,
    /// Fused speed clamped to the sanity range (m/s)
    pub sane_mps: f64,
    /// New exponentially smoothed speed (m/s)
    pub smoothed_mps: f64,
}

/// Speed fusion and smoothing engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedFusion {
    min_dt_secs: f64,
    segment_weight: f64,
    device_weight: f64,
    max_speed_mps: f64,
    alpha: f64,
}

impl Default for SpeedFusion {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl SpeedFusion {
    /// Build the engine from telemetry configuration
    #[must_use]
    pub const fn from_config(config: &TelemetryConfig) -> Self {
        Self {
            min_dt_secs: config.min_dt_secs,
            segment_weight: config.segment_weight,
            device_weight: config.device_weight,
            max_speed_mps: config.max_speed_mps,
            alpha: config.smoothing_alpha,
        }
    }

    /// Time delta between two points in seconds, floored at the minimum
    #[must_use]
    pub fn time_delta_secs(&self, prev: &TrackPoint, next: &TrackPoint) -> f64 {
        let dt = (next.timestamp_ms - prev.timestamp_ms) as f64 / MILLIS_PER_SECOND;
        dt.max(self.min_dt_secs)
    }

    /// Fuse one accepted point with its predecessor.
    ///
    /// A device speed that is negative (platforms report `-1` for "unknown")
    /// is treated as absent. A previous smoothed value of zero means "no
    /// estimate yet" and is replaced rather than blended.
    #[must_use]
    pub fn fuse(&self, prev: &TrackPoint, next: &TrackPoint, previous_smoothed: f64) -> SpeedEstimate {
        let dt = self.time_delta_secs(prev, next);
        let segment_mps = distance_between(prev, next) / dt;

        let fused_mps = match next.speed_mps.filter(|s| s.is_finite() && *s >= 0.0) {
            Some(device) => self.segment_weight.mul_add(segment_mps, self.device_weight * device),
            None => segment_mps,
        };

        let sane_mps = fused_mps.clamp(0.0, self.max_speed_mps);

        let smoothed_mps = if previous_smoothed <= 0.0 {
            sane_mps
        } else {
            self.alpha
                .mul_add(sane_mps, (1.0 - self.alpha) * previous_smoothed)
        };

        SpeedEstimate {
            segment_mps,
            fused_mps,
            sane_mps,
            smoothed_mps: smoothed_mps.clamp(0.0, self.max_speed_mps),
        }
    }
}
