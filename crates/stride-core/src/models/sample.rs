// ABOUTME: Raw location sample and accepted track point types
// ABOUTME: Mirrors the push payload of the platform location service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::geo::{MAX_LATITUDE_DEG, MAX_LONGITUDE_DEG};

/// One raw observation from the location acquisition service.
///
/// Immutable once created. Field aliases accept the compact keys
/// (`ts`, `acc`, `ele`, `spd`, `lon`) used by recorded tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    #[serde(alias = "lon")]
    pub lng: f64,
    /// Milliseconds since the Unix epoch
    #[serde(alias = "ts")]
    pub timestamp_ms: i64,
    /// Horizontal accuracy radius in meters
    #[serde(default, alias = "acc", skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    /// Altitude in meters
    #[serde(default, alias = "ele", skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    /// Device-reported ground speed in m/s
    #[serde(default, alias = "spd", skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,
}

/// A sample that passed the quality filter and was appended to the path
pub type TrackPoint = GeoSample;

impl GeoSample {
    /// Create a bare sample with position and time only
    #[must_use]
    pub const fn new(lat: f64, lng: f64, timestamp_ms: i64) -> Self {
        Self {
            lat,
            lng,
            timestamp_ms,
            accuracy_m: None,
            altitude_m: None,
            speed_mps: None,
        }
    }

    /// Set the horizontal accuracy
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Set the altitude
    #[must_use]
    pub const fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Set the device-reported speed
    #[must_use]
    pub const fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    /// Whether the coordinates and optional readings are physically meaningful.
    ///
    /// Non-finite values, coordinates outside the WGS84 range and negative
    /// accuracy are rejected before they can reach the telemetry math.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let coordinates_ok = self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LATITUDE_DEG
            && self.lng.abs() <= MAX_LONGITUDE_DEG;
        let accuracy_ok = self.accuracy_m.is_none_or(|a| a.is_finite() && a >= 0.0);
        let altitude_ok = self.altitude_m.is_none_or(f64::is_finite);
        let speed_ok = self.speed_mps.is_none_or(f64::is_finite);
        coordinates_ok && accuracy_ok && altitude_ok && speed_ok
    }

    /// Sample time as a UTC timestamp
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}
