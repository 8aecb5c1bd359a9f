// ABOUTME: Error handling surface of the application crate
// ABOUTME: Re-exports the workspace error type, codes and result alias from stride-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Unified Error Handling System
//!
//! The error types live in `stride-core` so the telemetry crate and the
//! application share one taxonomy. Application modules import them from here.

pub use stride_core::errors::{AppError, AppResult, ErrorCode};
