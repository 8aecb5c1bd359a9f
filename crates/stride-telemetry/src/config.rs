// ABOUTME: Telemetry threshold configuration with validated defaults
// ABOUTME: Groups filter, fusion, accumulation, split and auto-pause parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use stride_core::constants::{accumulator, autopause, filter, fusion};
use stride_core::errors::{AppError, AppResult};

/// Every tunable threshold of the telemetry pipeline.
///
/// Defaults reproduce the field-tested values; alternate values are mainly
/// useful for tests and for experimenting with other sports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Discard samples whose accuracy radius exceeds this (meters)
    pub max_accuracy_m: f64,
    /// Discard samples closer than this to the last accepted point (meters)
    pub min_movement_m: f64,
    /// Floor on the time delta between samples (seconds)
    pub min_dt_secs: f64,
    /// Weight of the segment-derived speed in the fused estimate
    pub segment_weight: f64,
    /// Weight of the device-reported speed in the fused estimate
    pub device_weight: f64,
    /// Upper clamp on the fused speed (m/s)
    pub max_speed_mps: f64,
    /// Smoothing weight of the newest fused speed
    pub smoothing_alpha: f64,
    /// Ascent steps must exceed this to count as gain (meters)
    pub min_ascent_m: f64,
    /// Split length (meters)
    pub split_distance_m: f64,
    /// Auto-pause when smoothed speed drops below this (m/s)
    pub pause_below_mps: f64,
    /// Auto-resume when smoothed speed reaches this (m/s)
    pub resume_at_mps: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: filter::MAX_ACCURACY_M,
            min_movement_m: filter::MIN_MOVEMENT_M,
            min_dt_secs: fusion::MIN_DT_SECS,
            segment_weight: fusion::SEGMENT_WEIGHT,
            device_weight: fusion::DEVICE_WEIGHT,
            max_speed_mps: fusion::MAX_SPEED_MPS,
            smoothing_alpha: fusion::SMOOTHING_ALPHA,
            min_ascent_m: accumulator::MIN_ASCENT_M,
            split_distance_m: accumulator::SPLIT_DISTANCE_M,
            pause_below_mps: autopause::PAUSE_BELOW_MPS,
            resume_at_mps: autopause::RESUME_AT_MPS,
        }
    }
}

impl TelemetryConfig {
    /// Check that the thresholds are mutually consistent
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error when a value is non-positive where a
    /// positive value is required, when the fusion weights do not sum to one,
    /// when alpha is outside `(0, 1]`, or when the resume threshold does not
    /// sit above the pause threshold (no hysteresis band).
    pub fn validate(&self) -> AppResult<()> {
        let positive = [
            ("max_accuracy_m", self.max_accuracy_m),
            ("min_dt_secs", self.min_dt_secs),
            ("max_speed_mps", self.max_speed_mps),
            ("split_distance_m", self.split_distance_m),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::config_invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("min_movement_m", self.min_movement_m),
            ("min_ascent_m", self.min_ascent_m),
            ("pause_below_mps", self.pause_below_mps),
            ("segment_weight", self.segment_weight),
            ("device_weight", self.device_weight),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::config_invalid(format!(
                    "{name} must be zero or positive, got {value}"
                )));
            }
        }

        if ((self.segment_weight + self.device_weight) - 1.0).abs() > 1e-9 {
            return Err(AppError::config_invalid(
                "segment_weight and device_weight must sum to 1",
            ));
        }

        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(AppError::config_invalid(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }

        if self.resume_at_mps <= self.pause_below_mps {
            return Err(AppError::config_invalid(format!(
                "resume threshold {} must be above pause threshold {}",
                self.resume_at_mps, self.pause_below_mps
            )));
        }

        Ok(())
    }
}
