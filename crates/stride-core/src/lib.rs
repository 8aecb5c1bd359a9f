// ABOUTME: Core types and constants for the Stride running coach
// ABOUTME: Foundation crate with error handling, domain models, units and formatters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![deny(unsafe_code)]

//! # Stride Core
//!
//! Foundation crate providing shared types and constants for the Stride
//! running coach. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Telemetry thresholds, unit conversions and persistence keys
//! - **models**: Location samples, goals, finalized sessions, settings and chat history
//! - **formatters**: Clock and pace formatting shared by cues, CLI and chat context

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`GeoSample`, `Goal`, `Session`, `RunnerSettings`)
pub mod models;

/// Human-readable clock and pace formatting
pub mod formatters;
