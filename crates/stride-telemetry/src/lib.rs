// ABOUTME: Run telemetry engine turning noisy location samples into clean run statistics
// ABOUTME: Filter, speed fusion, distance/elevation accumulation and split detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![deny(unsafe_code)]

//! # Stride Telemetry
//!
//! Pure, synchronous building blocks of the live run pipeline. Each accepted
//! sample flows through the stages in a fixed order:
//!
//! 1. [`filter::SampleFilter`] rejects imprecise fixes and stationary jitter
//! 2. [`fusion::SpeedFusion`] blends segment and device speed into a smoothed estimate
//! 3. [`accumulator::Accumulator`] integrates distance and ascent
//! 4. [`splits::SplitDetector`] records per-kilometer moving time
//!
//! None of the stages perform I/O or hold locks; the run state machine owns
//! the mutable totals and calls the stages in sequence.

/// Tunable thresholds for every telemetry stage
pub mod config;

/// Great-circle geometry
pub mod geo;

/// Sample quality filter
pub mod filter;

/// Speed fusion and exponential smoothing
pub mod fusion;

/// Distance and elevation accumulation
pub mod accumulator;

/// Per-kilometer split detection
pub mod splits;

pub use accumulator::{path_distance, recompute_elevation_gain, Accumulator, SegmentDelta};
pub use config::TelemetryConfig;
pub use filter::{Rejection, SampleFilter};
pub use fusion::{SpeedEstimate, SpeedFusion};
pub use geo::{distance_between, haversine_m};
pub use splits::{RecordedSplit, SplitDetector};
