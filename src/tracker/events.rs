// ABOUTME: Outcomes of sample handling and events emitted by the run tracker
// ABOUTME: Consumed by the runtime to drive acquisition, speech and cue scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use serde::{Deserialize, Serialize};
use stride_telemetry::{RecordedSplit, Rejection};

use super::state::RunPhase;

/// Why a sample never reached the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No run is in progress
    NotTracking,
    /// Run is manually paused; the sample is from a stale subscription
    Paused,
    /// Non-finite or out-of-range values
    Malformed,
    /// Timestamp not after the last accepted point
    OutOfOrder,
}

/// Result of offering one raw sample to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SampleOutcome {
    /// Passed the filter and updated the run
    Accepted,
    /// Failed the quality filter
    Rejected {
        /// Filter rule that failed
        reason: Rejection,
    },
    /// Dropped before filtering
    Ignored {
        /// Why it was dropped
        reason: IgnoreReason,
    },
}

impl SampleOutcome {
    /// Whether the sample was accepted
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// What caused a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Explicit start/pause/resume/stop
    Command,
    /// Smoothed speed fell below the pause threshold
    AutoPause,
    /// Smoothed speed reached the resume threshold
    AutoResume,
}

/// Side effects requested by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// Phase changed
    PhaseChanged {
        /// Previous phase
        from: RunPhase,
        /// New phase
        to: RunPhase,
        /// Trigger
        cause: TransitionCause,
    },
    /// A kilometer split was recorded
    SplitRecorded(RecordedSplit),
    /// Location acquisition must be started or torn down
    AcquisitionChanged {
        /// Whether acquisition should be live
        active: bool,
    },
}
