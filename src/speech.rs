// ABOUTME: Speech output port for spoken coaching cues
// ABOUTME: Fire-and-forget sinks plus a gate honouring the voice cue setting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use std::sync::Arc;
use tracing::{debug, info};

/// Capability to vocalize text
///
/// Implementations must not block: speaking is fire-and-forget and failures
/// are never reported back.
pub trait SpeechSink: Send + Sync {
    /// Speak the text, interrupting anything currently spoken
    fn speak(&self, text: &str);
}

/// Writes every utterance to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpeech;

impl SpeechSink for LogSpeech {
    fn speak(&self, text: &str) {
        info!(target: "stride_coach::speech", utterance = %text, "Speaking cue");
    }
}

/// Discards every utterance
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechSink for NullSpeech {
    fn speak(&self, _text: &str) {}
}

/// Forwards utterances only while voice cues are enabled
#[derive(Clone)]
pub struct VoiceGate {
    sink: Arc<dyn SpeechSink>,
    enabled: bool,
}

impl VoiceGate {
    /// Wrap a sink
    #[must_use]
    pub fn new(sink: Arc<dyn SpeechSink>, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    /// Whether utterances are forwarded
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Speak if enabled
    pub fn say(&self, text: &str) {
        if self.enabled {
            self.sink.speak(text);
        } else {
            debug!(utterance = %text, "Voice cues disabled, skipping");
        }
    }
}
