// ABOUTME: Coaching text features built on the LLM provider
// ABOUTME: Live spoken cues from run snapshots and the persisted coach chat
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Coaching
//!
//! [`CoachingService`] turns a [`RunSnapshot`] into one or two spoken
//! sentences. [`CoachChat`] answers free-text questions, grounding each one
//! in the numbers of the most recent saved session and remembering the
//! conversation across invocations.

use std::fmt::Write as _;
use std::sync::Arc;
use stride_core::formatters::{format_clock, format_pace_seconds};
use stride_core::models::{ConversationEntry, ConversationRole, Session};
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::errors::AppResult;
use crate::llm::prompts::{coach_system_prompt, live_cue_system_prompt};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::storage::{ChatLog, SessionRepository};
use crate::tracker::RunSnapshot;

/// Upper bound on the length of a spoken cue
const CUE_MAX_TOKENS: u32 = 120;

/// Context line used when no session has been saved yet
pub const NO_SESSION_CONTEXT: &str = "No saved sessions";

/// Generates live coaching cues
#[derive(Clone)]
pub struct CoachingService {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl CoachingService {
    /// Create a service using the configured model and temperature
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Coaching text for the current state of the run
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a credential, or an external service
    /// error when the provider fails.
    #[instrument(skip_all, fields(distance_m = snapshot.distance_m))]
    pub async fn cue_for(&self, snapshot: &RunSnapshot) -> AppResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(live_cue_system_prompt()),
            ChatMessage::user(format!("Live run: {}", snapshot.describe())),
        ])
        .with_model(self.model.clone())
        .with_temperature(self.temperature)
        .with_max_tokens(CUE_MAX_TOKENS);

        let response = self.provider.complete(&request).await?;
        debug!(chars = response.content.len(), "Coaching cue generated");
        Ok(response.content)
    }
}

/// Coach chat with persisted history
#[derive(Clone)]
pub struct CoachChat {
    provider: Arc<dyn LlmProvider>,
    log: ChatLog,
    sessions: SessionRepository,
    model: String,
    temperature: f32,
}

impl CoachChat {
    /// Create a chat over the given history and session stores
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        log: ChatLog,
        sessions: SessionRepository,
        config: &LlmConfig,
    ) -> Self {
        Self {
            provider,
            log,
            sessions,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Ask the coach a question and record the exchange
    ///
    /// Nothing is recorded when the provider fails, so the question can be
    /// asked again.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a credential, an external service
    /// error when the provider fails, or a storage error.
    #[instrument(skip_all)]
    pub async fn send(&self, message: &str) -> AppResult<String> {
        let history = self.log.history().await?;
        let latest = self.sessions.latest().await?;
        let context = build_session_context(latest.as_ref());

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(coach_system_prompt()));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(format!("{message}\n\nContext: {context}")));

        let request = ChatRequest::new(messages)
            .with_model(self.model.clone())
            .with_temperature(self.temperature);
        let response = self.provider.complete(&request).await?;

        self.log
            .append(&[
                ConversationEntry::new(ConversationRole::User, message),
                ConversationEntry::new(ConversationRole::Assistant, response.content.clone()),
            ])
            .await?;
        debug!(history = history.len() + 2, "Chat exchange recorded");

        Ok(response.content)
    }

    /// Conversation so far, oldest first
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log cannot be read.
    pub async fn history(&self) -> AppResult<Vec<ConversationEntry>> {
        self.log.history().await
    }
}

/// Numeric summary of a session for the chat prompt
///
/// `dist=5.02km, time=25:10, avg_pace=05:01, gain=42m, splits=[km1:05:03, ...]`
#[must_use]
pub fn build_session_context(session: Option<&Session>) -> String {
    let Some(session) = session else {
        return NO_SESSION_CONTEXT.to_owned();
    };

    let splits = session
        .splits
        .iter()
        .enumerate()
        .fold(String::new(), |mut acc, (i, secs)| {
            if i > 0 {
                acc.push_str(", ");
            }
            let _ = write!(acc, "km{}:{}", i + 1, format_clock(*secs));
            acc
        });

    format!(
        "dist={:.2}km, time={}, avg_pace={}, gain={}m, splits=[{splits}]",
        session.distance_km(),
        format_clock(session.moving_time_s),
        format_pace_seconds(session.average_pace_sec_per_km),
        session.elevation_gain_m.round(),
    )
}
