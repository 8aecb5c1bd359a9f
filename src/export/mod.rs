// ABOUTME: Session export formats
// ABOUTME: GPX 1.1 writer consumed by the CLI export command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

/// GPX 1.1 export
pub mod gpx;

pub use gpx::{gpx_file_name, to_gpx};
