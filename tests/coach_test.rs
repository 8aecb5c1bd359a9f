// ABOUTME: Integration tests for live coaching cues and the persisted coach chat
// ABOUTME: Uses a scripted provider; the real provider is only exercised without a credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use common::{init_test_logging, memory_store, straight_track, Script, ScriptedLlm};
use std::sync::Arc;
use stride_coach::coach::{build_session_context, CoachChat, CoachingService, NO_SESSION_CONTEXT};
use stride_coach::config::LlmConfig;
use stride_coach::errors::ErrorCode;
use stride_coach::llm::{
    ChatMessage, ChatRequest, LlmProvider, MessageRole, OpenAiCompatibleProvider,
};
use stride_coach::models::{ConversationRole, Session};
use stride_coach::storage::{ChatLog, KeyValueStore, SessionRepository};
use stride_coach::tracker::RunTracker;
use stride_coach::TelemetryConfig;
use uuid::Uuid;

fn saved_session() -> Session {
    Session {
        id: Uuid::new_v4(),
        name: "Run 2025-03-02 07:15".to_owned(),
        distance_m: 5_020.0,
        moving_time_s: 1_510,
        average_pace_sec_per_km: Session::average_pace(5_020.0, 1_510),
        path: straight_track(6, 20.0, 5_000),
        splits: vec![303, 299, 301, 300, 302],
        elevation_gain_m: 41.6,
        goal: None,
        created_at: Utc::now(),
    }
}

fn chat(provider: Arc<dyn LlmProvider>, store: &Arc<dyn KeyValueStore>) -> CoachChat {
    CoachChat::new(
        provider,
        ChatLog::new(store.clone()),
        SessionRepository::new(store.clone()),
        &LlmConfig::default(),
    )
}

#[test]
fn test_context_for_saved_session() {
    let context = build_session_context(Some(&saved_session()));

    assert_eq!(
        context,
        "dist=5.02km, time=25:10, avg_pace=05:01, gain=42m, \
         splits=[km1:05:03, km2:04:59, km3:05:01, km4:05:00, km5:05:02]"
    );
}

#[test]
fn test_context_without_sessions() {
    assert_eq!(build_session_context(None), NO_SESSION_CONTEXT);
    assert_eq!(NO_SESSION_CONTEXT, "No saved sessions");
}

#[tokio::test]
async fn test_chat_sends_history_and_latest_session_context() {
    init_test_logging();
    let store = memory_store();
    SessionRepository::new(store.clone())
        .prepend(&saved_session())
        .await
        .unwrap();
    let llm = ScriptedLlm::replying("Keep the easy days easy.");
    let chat = chat(llm.clone(), &store);

    let first = chat.send("How did my last run go?").await.unwrap();
    chat.send("What next?").await.unwrap();

    assert_eq!(first, "Keep the easy days easy.");
    let requests = llm.requests();
    assert_eq!(requests.len(), 2);

    let opening = &requests[0].messages;
    assert_eq!(opening.len(), 2);
    assert_eq!(opening[0].role, MessageRole::System);
    assert!(opening[1]
        .content
        .starts_with("How did my last run go?\n\nContext: dist=5.02km"));

    // Second request replays the first exchange between system prompt and question
    let follow_up = &requests[1].messages;
    let roles: Vec<_> = follow_up.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User
        ]
    );
    assert_eq!(follow_up[1].content, "How did my last run go?");
    assert_eq!(follow_up[2].content, "Keep the easy days easy.");
}

#[tokio::test]
async fn test_chat_history_is_persisted_in_order() {
    init_test_logging();
    let store = memory_store();
    let chat = chat(ScriptedLlm::replying("Rest tomorrow."), &store);

    chat.send("Am I overtraining?").await.unwrap();

    let history = chat.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ConversationRole::User);
    assert_eq!(history[0].content, "Am I overtraining?");
    assert_eq!(history[1].role, ConversationRole::Assistant);
    assert_eq!(history[1].content, "Rest tomorrow.");

    // A new chat over the same store sees the same log
    let reopened = ChatLog::new(store.clone()).history().await.unwrap();
    assert_eq!(reopened, history);
}

#[tokio::test]
async fn test_failed_exchange_is_not_recorded() {
    init_test_logging();
    let store = memory_store();
    let chat = chat(ScriptedLlm::new(Script::Unavailable), &store);

    let err = chat.send("Hello?").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert!(chat.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_request() {
    init_test_logging();
    let provider = OpenAiCompatibleProvider::new(LlmConfig {
        base_url: "http://127.0.0.1:9/v1".to_owned(),
        ..LlmConfig::default()
    });
    assert!(!provider.has_credential());

    let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
    let err = provider.complete(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);

    let store = memory_store();
    let chat = chat(Arc::new(provider), &store);
    let err = chat.send("hi").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(chat.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_unavailable() {
    init_test_logging();
    let provider = OpenAiCompatibleProvider::new(LlmConfig {
        base_url: "http://127.0.0.1:9/v1".to_owned(),
        api_key: Some("test-key".to_owned()),
        ..LlmConfig::default()
    });

    let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
    let err = provider.complete(&request).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_live_cue_request_describes_the_run() {
    init_test_logging();
    let llm = ScriptedLlm::replying("Smooth and steady.");
    let service = CoachingService::new(llm.clone(), &LlmConfig::default());

    let mut tracker = RunTracker::new(TelemetryConfig::default(), false);
    tracker.start(None).unwrap();
    for sample in straight_track(5, 25.0, 5_000) {
        tracker.handle_sample(sample);
    }
    for _ in 0..20 {
        tracker.tick();
    }

    let text = service.cue_for(&tracker.snapshot()).await.unwrap();

    assert_eq!(text, "Smooth and steady.");
    let request = &llm.requests()[0];
    assert_eq!(request.max_tokens, Some(120));
    assert_eq!(request.model.as_deref(), Some("deepseek-chat"));
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert_eq!(
        request.messages[1].content,
        "Live run: distance=0.10km, time=00:20, current_pace=03:20, average_pace=03:20, elevation_gain=0m"
    );
}
