// ABOUTME: Great-circle distance between two WGS84 coordinates
// ABOUTME: Haversine formula on a spherical Earth of radius 6,371 km
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use stride_core::constants::geo::EARTH_RADIUS_M;
use stride_core::models::GeoSample;

/// Haversine distance in meters between two coordinates given in degrees
#[must_use]
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();

    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lng / 2.0).sin();
    let a = s1.mul_add(s1, phi1.cos() * phi2.cos() * s2 * s2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance in meters between two samples
#[must_use]
pub fn distance_between(a: &GeoSample, b: &GeoSample) -> f64 {
    haversine_m(a.lat, a.lng, b.lat, b.lng)
}
