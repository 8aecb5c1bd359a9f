// ABOUTME: Speech sink that prints cues to the terminal
// ABOUTME: Stands in for a text-to-speech engine when replaying runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use stride_coach::speech::SpeechSink;

/// Prints each utterance on its own line
pub struct ConsoleSpeech;

impl SpeechSink for ConsoleSpeech {
    fn speak(&self, text: &str) {
        println!("  [coach] {text}");
    }
}
