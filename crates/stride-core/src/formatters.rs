// ABOUTME: Clock and pace formatting shared by spoken cues, CLI output and chat context
// ABOUTME: Converts seconds and m/s into MM:SS style strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use crate::constants::units::{METERS_PER_KM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Placeholder shown when no pace can be derived
pub const UNKNOWN_PACE: &str = "--:--";

/// Format elapsed seconds as `MM:SS`, or `HH:MM:SS` from one hour on
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Seconds per kilometer for a speed in m/s
///
/// Returns `None` for zero, negative or non-finite speeds.
#[must_use]
pub fn pace_seconds_per_km(speed_mps: f64) -> Option<f64> {
    (speed_mps.is_finite() && speed_mps > 0.0).then(|| METERS_PER_KM / speed_mps)
}

/// Format a speed as a per-kilometer pace (`MM:SS`)
#[must_use]
pub fn format_pace(speed_mps: Option<f64>) -> String {
    speed_mps
        .and_then(pace_seconds_per_km)
        .map_or_else(|| UNKNOWN_PACE.to_owned(), format_pace_seconds)
}

/// Format a pace already expressed in seconds per kilometer
#[must_use]
pub fn format_pace_seconds(seconds_per_km: f64) -> String {
    if !seconds_per_km.is_finite() || seconds_per_km <= 0.0 {
        return UNKNOWN_PACE.to_owned();
    }
    let total = seconds_per_km.round() as u64;
    format!(
        "{:02}:{:02}",
        total / SECONDS_PER_MINUTE,
        total % SECONDS_PER_MINUTE
    )
}

/// Parse a `MM:SS` pace into seconds per kilometer
#[must_use]
pub fn parse_pace(text: &str) -> Option<u32> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    (seconds < 60).then_some(minutes * 60 + seconds)
}
