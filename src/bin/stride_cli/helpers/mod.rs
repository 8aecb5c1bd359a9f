// ABOUTME: Helper modules for stride-cli
// ABOUTME: Console output formatting and the terminal speech sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

pub mod console;
pub mod display;
