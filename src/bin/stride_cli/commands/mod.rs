// ABOUTME: Re-exports command modules for stride-cli
// ABOUTME: Replay, session history, GPX export, coach chat and settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

pub mod chat;
pub mod export;
pub mod replay;
pub mod sessions;
pub mod settings;
