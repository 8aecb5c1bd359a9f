// ABOUTME: Geo-sample quality filter rejecting imprecise fixes and stationary jitter
// ABOUTME: Pure predicate over a candidate sample and the last accepted point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use stride_core::models::{GeoSample, TrackPoint};

use crate::config::TelemetryConfig;
use crate::geo::distance_between;

/// Why a sample did not pass the filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// Reported accuracy radius is above the limit
    LowAccuracy {
        /// Reported accuracy in meters
        accuracy_m: f64,
    },
    /// Too close to the last accepted point to be real movement
    Jitter {
        /// Distance to the last accepted point in meters
        moved_m: f64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowAccuracy { accuracy_m } => write!(f, "accuracy {accuracy_m:.1} m too low"),
            Self::Jitter { moved_m } => write!(f, "moved only {moved_m:.2} m"),
        }
    }
}

/// Quality gate applied to every raw sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFilter {
    max_accuracy_m: f64,
    min_movement_m: f64,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl SampleFilter {
    /// Build a filter from telemetry configuration
    #[must_use]
    pub const fn from_config(config: &TelemetryConfig) -> Self {
        Self {
            max_accuracy_m: config.max_accuracy_m,
            min_movement_m: config.min_movement_m,
        }
    }

    /// Evaluate the rules in order: accuracy first, then minimum movement
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies.
    pub fn evaluate(&self, sample: &GeoSample, last: Option<&TrackPoint>) -> Result<(), Rejection> {
        if let Some(accuracy_m) = sample.accuracy_m {
            if accuracy_m > self.max_accuracy_m {
                return Err(Rejection::LowAccuracy { accuracy_m });
            }
        }

        if let Some(previous) = last {
            let moved_m = distance_between(previous, sample);
            if moved_m < self.min_movement_m {
                return Err(Rejection::Jitter { moved_m });
            }
        }

        Ok(())
    }

    /// Whether the sample passes the filter
    #[must_use]
    pub fn accept(&self, sample: &GeoSample, last: Option<&TrackPoint>) -> bool {
        self.evaluate(sample, last).is_ok()
    }
}
