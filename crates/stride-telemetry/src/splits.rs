// ABOUTME: Per-kilometer split detection from cumulative distance and moving time
// ABOUTME: Records every crossed boundary so split count always matches whole kilometers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelemetryConfig;

/// A split appended by one detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSplit {
    /// 1-based split number (kilometer index with the default length)
    pub number: usize,
    /// Moving time spent on this split (seconds)
    pub seconds: u64,
}

/// Detects split boundary crossings after each distance update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitDetector {
    split_distance_m: f64,
}

impl Default for SplitDetector {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl SplitDetector {
    /// Build a detector from telemetry configuration
    #[must_use]
    pub const fn from_config(config: &TelemetryConfig) -> Self {
        Self {
            split_distance_m: config.split_distance_m,
        }
    }

    /// Number of whole splits covered by a distance
    #[must_use]
    pub fn completed(&self, distance_m: f64) -> usize {
        if distance_m <= 0.0 {
            return 0;
        }
        (distance_m / self.split_distance_m).floor() as usize
    }

    /// Append a split for every boundary crossed since the last pass.
    ///
    /// With one boundary crossed the split is the moving time not yet
    /// attributed to earlier splits. When a single update crosses several
    /// boundaries, that unattributed time is shared in proportion to distance:
    /// each full split gets `T * split / D` seconds and the last one takes
    /// the remainder, so the splits always sum to the moving time.
    pub fn detect(
        &self,
        distance_m: f64,
        moving_time_s: u64,
        splits: &mut Vec<u64>,
    ) -> Vec<RecordedSplit> {
        let done = self.completed(distance_m);
        if done <= splits.len() {
            return Vec::new();
        }

        let crossed = done - splits.len();
        let attributed: u64 = splits.iter().sum();
        let unattributed = moving_time_s.saturating_sub(attributed);
        let mut recorded = Vec::with_capacity(crossed);

        if crossed > 1 {
            debug!(crossed, distance_m, "several split boundaries crossed in one update");
            let uncovered_m = (splits.len() as f64)
                .mul_add(-self.split_distance_m, distance_m)
                .max(self.split_distance_m);
            let share = (unattributed as f64 * self.split_distance_m / uncovered_m).floor() as u64;
            for _ in 1..crossed {
                splits.push(share);
                recorded.push(RecordedSplit {
                    number: splits.len(),
                    seconds: share,
                });
            }
        }

        let already: u64 = splits.iter().sum();
        let last = moving_time_s.saturating_sub(already);
        splits.push(last);
        recorded.push(RecordedSplit {
            number: splits.len(),
            seconds: last,
        });

        recorded
    }
}
