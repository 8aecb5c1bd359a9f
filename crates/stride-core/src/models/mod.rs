// ABOUTME: Core data models and types for the Stride running coach
// ABOUTME: Re-exports location samples, goals, finalized sessions, settings and chat entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Data Models
//!
//! ## Core Models
//!
//! - `GeoSample`: one raw observation from the location acquisition service
//! - `TrackPoint`: a sample that passed the quality filter and joined the path
//! - `Goal`: optional distance/pace or duration target for a run
//! - `Session`: the immutable record persisted when a run stops
//! - `RunnerSettings`: persisted preferences (target pace, auto-pause, voice)
//! - `ConversationEntry`: one message of the coach chat history

mod conversation;
mod goal;
mod sample;
mod session;
mod settings;

pub use conversation::{ConversationEntry, ConversationRole};
pub use goal::Goal;
pub use sample::{GeoSample, TrackPoint};
pub use session::Session;
pub use settings::RunnerSettings;
