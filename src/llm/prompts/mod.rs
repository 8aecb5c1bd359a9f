// ABOUTME: System prompts for coaching text generation loaded at compile time
// ABOUTME: Provides the coach chat persona and the short live-cue instruction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Coach persona used by the chat and by live cues
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Extra instruction appended for spoken mid-run cues
pub const LIVE_CUE_PROMPT: &str = include_str!("live_cue.md");

/// System prompt for the coach chat
#[must_use]
pub const fn coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}

/// System prompt for live spoken cues
#[must_use]
pub fn live_cue_system_prompt() -> String {
    format!("{}\n\n{}", COACH_SYSTEM_PROMPT.trim_end(), LIVE_CUE_PROMPT.trim_end())
}
