// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Telemetry thresholds, unit conversions, cue cadence and persistence keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat list. Tunable values are mirrored by the telemetry and application
//! configuration structs, which use these as their defaults.

/// Geodesy constants
pub mod geo {
    /// Mean Earth radius used by the haversine formula (meters)
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
    /// Valid latitude bound (degrees)
    pub const MAX_LATITUDE_DEG: f64 = 90.0;
    /// Valid longitude bound (degrees)
    pub const MAX_LONGITUDE_DEG: f64 = 180.0;
}

/// Sample quality gates
pub mod filter {
    /// Samples with a horizontal accuracy worse than this are discarded (meters)
    pub const MAX_ACCURACY_M: f64 = 30.0;
    /// Movement below this distance is treated as stationary jitter (meters)
    pub const MIN_MOVEMENT_M: f64 = 2.0;
}

/// Speed fusion and smoothing
pub mod fusion {
    /// Lower bound on the time delta between two samples (seconds)
    pub const MIN_DT_SECS: f64 = 0.5;
    /// Weight of the segment-derived speed when the device reports speed too
    pub const SEGMENT_WEIGHT: f64 = 0.6;
    /// Weight of the device-reported speed
    pub const DEVICE_WEIGHT: f64 = 0.4;
    /// Sanity ceiling for foot running (m/s, about 32 km/h)
    pub const MAX_SPEED_MPS: f64 = 9.0;
    /// Exponential smoothing weight of the newest observation
    pub const SMOOTHING_ALPHA: f64 = 0.35;
}

/// Distance and elevation accumulation
pub mod accumulator {
    /// Ascents at or below this step are treated as barometric/GPS noise (meters)
    pub const MIN_ASCENT_M: f64 = 0.5;
    /// Length of one split (meters)
    pub const SPLIT_DISTANCE_M: f64 = 1000.0;
}

/// Automatic pause/resume hysteresis
pub mod autopause {
    /// Smoothed speed below which a running session auto-pauses (m/s)
    pub const PAUSE_BELOW_MPS: f64 = 0.5;
    /// Smoothed speed at or above which an auto-paused session resumes (m/s)
    pub const RESUME_AT_MPS: f64 = 0.8;
}

/// Coaching cue cadence
pub mod cues {
    /// Polling cadence for the cue scheduler (seconds)
    pub const POLL_INTERVAL_SECS: u64 = 4;
    /// Minimum time between coaching requests (seconds)
    pub const MIN_INTERVAL_SECS: u64 = 20;
    /// Distance that triggers a coaching request regardless of time (meters)
    pub const DISTANCE_TRIGGER_M: f64 = 200.0;
    /// Cadence of the pace deviation check (seconds)
    pub const PACE_CHECK_INTERVAL_SECS: u64 = 30;
    /// Default pace deviation tolerance (seconds per km)
    pub const PACE_TOLERANCE_SECS: f64 = 6.0;
    /// Lowest accepted pace deviation tolerance (seconds per km)
    pub const MIN_PACE_TOLERANCE_SECS: f64 = 6.0;
    /// Highest accepted pace deviation tolerance (seconds per km)
    pub const MAX_PACE_TOLERANCE_SECS: f64 = 8.0;
}

/// Session persistence rules
pub mod session {
    /// Runs shorter than this are discarded at stop (meters)
    pub const MIN_SAVE_DISTANCE_M: f64 = 50.0;
    /// Runs with fewer accepted points are discarded at stop
    pub const MIN_SAVE_POINTS: usize = 5;
    /// Default half-marathon race distance used for goal progress (km)
    pub const DEFAULT_RACE_DISTANCE_KM: f64 = 21.1;
    /// Default target pace (seconds per km)
    pub const DEFAULT_TARGET_PACE_SECS: u32 = 280;
}

/// External elevation service
pub mod elevation {
    /// Largest batch accepted by the elevation lookup service
    pub const MAX_BATCH_SIZE: usize = 90;
    /// Default lookup endpoint
    pub const DEFAULT_LOOKUP_URL: &str = "https://api.open-elevation.com/api/v1/lookup";
}

/// Key names in the key-value persistence port
pub mod storage_keys {
    /// Finalized sessions, newest first
    pub const SESSIONS: &str = "sessions";
    /// Runner settings
    pub const SETTINGS: &str = "settings";
    /// Coach chat history
    pub const CHAT: &str = "chat";
}

/// Unit conversions
pub mod units {
    /// Meters in one kilometer
    pub const METERS_PER_KM: f64 = 1000.0;
    /// Milliseconds in one second
    pub const MILLIS_PER_SECOND: f64 = 1000.0;
    /// Seconds in one minute
    pub const SECONDS_PER_MINUTE: u64 = 60;
    /// Seconds in one hour
    pub const SECONDS_PER_HOUR: u64 = 3600;
}
