// ABOUTME: Configuration management module for the Stride running coach
// ABOUTME: Environment-driven settings for storage, coaching, elevation and cue cadence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! Configuration module
//!
//! All runtime configuration comes from environment variables with defaults;
//! there is no configuration file. Telemetry thresholds live in
//! [`stride_telemetry::TelemetryConfig`] and are carried here so the runtime
//! receives everything it needs from a single value.

/// Environment variable parsing into strongly typed configuration
pub mod environment;

pub use environment::{AppConfig, CueConfig, ElevationConfig, LlmConfig};
