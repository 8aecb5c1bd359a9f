// ABOUTME: Integration tests for the async run runtime
// ABOUTME: Drives the run task with a scripted location source on a paused tokio clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    finalizer, init_test_logging, memory_store, sample_at, straight_track, ChannelSource,
    RecordingSpeech, Script, ScriptedLlm, StubElevation,
};
use std::sync::Arc;
use std::time::Duration;
use stride_coach::coach::CoachingService;
use stride_coach::config::{CueConfig, LlmConfig};
use stride_coach::cues::phrases;
use stride_coach::errors::ErrorCode;
use stride_coach::models::{Goal, RunnerSettings};
use stride_coach::runtime::{ReplaySource, RunContext, RunController, RunHandle};
use stride_coach::storage::{KeyValueStore, SessionRepository};
use stride_coach::tracker::RunPhase;
use stride_coach::TelemetryConfig;
use tokio::time::sleep;

struct Harness {
    run: RunHandle,
    source: ChannelSource,
    speech: Arc<RecordingSpeech>,
    store: Arc<dyn KeyValueStore>,
}

fn spawn_run(settings: RunnerSettings, coaching: Option<CoachingService>) -> Harness {
    spawn_with_source(ChannelSource::new(), settings, coaching)
}

fn spawn_with_source(
    source: ChannelSource,
    settings: RunnerSettings,
    coaching: Option<CoachingService>,
) -> Harness {
    init_test_logging();
    let speech = RecordingSpeech::new();
    let store = memory_store();
    let run = RunController::spawn(RunContext {
        telemetry: TelemetryConfig::default(),
        cues: CueConfig::default(),
        settings,
        source: Box::new(source.clone()),
        speech: speech.clone(),
        coaching,
        finalizer: finalizer(StubElevation::constant(12.0), store.clone()),
    });
    Harness {
        run,
        source,
        speech,
        store,
    }
}

fn quiet_settings() -> RunnerSettings {
    RunnerSettings {
        auto_pause: false,
        ..RunnerSettings::default()
    }
}

/// Push samples `step_m` apart, letting `step_secs` of wall clock pass between them
async fn feed(source: &ChannelSource, from: usize, count: usize, step_m: f64, step_secs: u64) {
    for i in from..from + count {
        let ts = i64::try_from(i as u64 * step_secs * 1000).unwrap();
        assert!(source.push(sample_at(i as f64 * step_m, ts)).await);
        sleep(Duration::from_secs(step_secs)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_lifecycle_saves_session() {
    let h = spawn_run(quiet_settings(), None);

    h.run.start(None).await.unwrap();
    assert_eq!(h.source.start_count(), 1);
    feed(&h.source, 0, 10, 20.0, 4).await;

    let snapshot = h.run.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, RunPhase::Running);
    assert_eq!(snapshot.point_count, 10);
    assert!((39..=41).contains(&snapshot.moving_time_s));

    let session = h.run.stop().await.unwrap().unwrap();
    assert_eq!(session.path.len(), 10);
    assert!((session.distance_m - 180.0).abs() < 0.01);
    assert!(session.path.iter().all(|p| p.altitude_m == Some(12.0)));

    assert!(h.speech.said(phrases::RUN_STARTED));
    assert!(h.speech.said(phrases::RUN_SAVED));
    let saved = SessionRepository::new(h.store.clone()).list().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, session.id);
}

#[tokio::test(start_paused = true)]
async fn test_short_run_is_not_saved() {
    let h = spawn_run(quiet_settings(), None);

    h.run.start(None).await.unwrap();
    feed(&h.source, 0, 3, 10.0, 4).await;

    assert!(h.run.stop().await.unwrap().is_none());
    assert!(!h.speech.said(phrases::RUN_SAVED));
    assert!(SessionRepository::new(h.store.clone())
        .list()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_commands_in_wrong_phase_are_rejected() {
    let h = spawn_run(quiet_settings(), None);

    assert_eq!(h.run.pause().await.unwrap_err().code, ErrorCode::InvalidState);
    assert_eq!(h.run.stop().await.unwrap_err().code, ErrorCode::InvalidState);

    h.run.start(None).await.unwrap();
    assert_eq!(
        h.run.start(None).await.unwrap_err().code,
        ErrorCode::InvalidState
    );
    assert_eq!(h.run.resume().await.unwrap_err().code, ErrorCode::InvalidState);
}

#[tokio::test(start_paused = true)]
async fn test_stale_epoch_samples_are_discarded() {
    let h = spawn_run(quiet_settings(), None);
    h.run.start(None).await.unwrap();
    feed(&h.source, 0, 3, 20.0, 4).await;
    let first_sink = h.source.current_sink().unwrap();

    h.run.pause().await.unwrap();
    assert!(h.speech.said(phrases::RUN_PAUSED));
    // Delivered while paused: acquisition is down
    first_sink.send(sample_at(60.0, 12_000)).await;
    assert_eq!(h.run.snapshot().await.unwrap().point_count, 3);

    h.run.resume().await.unwrap();
    assert!(h.speech.said(phrases::RUN_RESUMED));
    let second_sink = h.source.current_sink().unwrap();
    assert!(second_sink.epoch() > first_sink.epoch());

    // Late sample from the torn-down acquisition
    first_sink.send(sample_at(80.0, 20_000)).await;
    assert_eq!(h.run.snapshot().await.unwrap().point_count, 3);

    second_sink.send(sample_at(100.0, 30_000)).await;
    let snapshot = h.run.snapshot().await.unwrap();
    assert_eq!(snapshot.point_count, 4);
    // First point after resume opens a new segment
    assert!((snapshot.distance_m - 40.0).abs() < 0.01);
    assert_eq!(h.source.start_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_moving_time_stops_while_paused() {
    let h = spawn_run(quiet_settings(), None);
    h.run.start(None).await.unwrap();

    sleep(Duration::from_millis(10_500)).await;
    h.run.pause().await.unwrap();
    let paused_at = h.run.snapshot().await.unwrap().moving_time_s;
    assert_eq!(paused_at, 10);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(h.run.snapshot().await.unwrap().moving_time_s, paused_at);

    // The clock keeps its one-second grid across the pause
    h.run.resume().await.unwrap();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(h.run.snapshot().await.unwrap().moving_time_s, 15);
}

#[tokio::test(start_paused = true)]
async fn test_split_is_announced() {
    let h = spawn_run(quiet_settings(), None);
    h.run.start(None).await.unwrap();

    feed(&h.source, 0, 12, 100.0, 25).await;

    let spoken = h.speech.spoken();
    assert!(
        spoken.iter().any(|s| s.starts_with("Kilometer 1. Split ")),
        "spoken: {spoken:?}"
    );
    assert_eq!(h.run.snapshot().await.unwrap().splits_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_acquisition_leaves_run_idle_and_silent() {
    let h = spawn_with_source(ChannelSource::unavailable(), quiet_settings(), None);

    let err = h.run.start(None).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::SensorUnavailable);
    assert!(h.speech.spoken().is_empty());
    assert_eq!(h.run.snapshot().await.unwrap().phase, RunPhase::Idle);
    // Still startable: the failure is reported again rather than InvalidState
    assert_eq!(
        h.run.start(None).await.unwrap_err().code,
        ErrorCode::SensorUnavailable
    );
}

#[tokio::test(start_paused = true)]
async fn test_auto_pause_keeps_acquisition_and_announces() {
    let h = spawn_run(RunnerSettings::default(), None);
    h.run.start(None).await.unwrap();

    feed(&h.source, 0, 6, 12.0, 4).await;
    // 2.5 m every 10 s continuing from 60 m
    for i in 0..10_u64 {
        let ts = i64::try_from(24_000 + (i + 1) * 10_000).unwrap();
        h.source
            .push(sample_at((i + 1) as f64 * 2.5 + 60.0, ts))
            .await;
        sleep(Duration::from_secs(10)).await;
    }

    assert_eq!(h.run.snapshot().await.unwrap().phase, RunPhase::Paused);
    assert!(h.speech.said(phrases::RUN_PAUSED));
    assert_eq!(h.source.stop_count(), 0);
    assert_eq!(h.source.start_count(), 1);

    h.source.push(sample_at(125.0, 134_000)).await;
    assert_eq!(h.run.snapshot().await.unwrap().phase, RunPhase::Running);
    assert!(h.speech.said(phrases::RUN_RESUMED));
}

#[tokio::test(start_paused = true)]
async fn test_live_coaching_cue_is_spoken() {
    let llm = ScriptedLlm::replying("Nice rhythm, keep it up.");
    let coaching = CoachingService::new(llm.clone(), &LlmConfig::default());
    let h = spawn_run(quiet_settings(), Some(coaching));
    h.run.start(None).await.unwrap();

    feed(&h.source, 0, 7, 15.0, 4).await;

    assert!(h.speech.said("Nice rhythm, keep it up."));
    let requests = llm.requests();
    assert!(!requests.is_empty());
    let prompt = &requests[0].messages.last().unwrap().content;
    assert!(prompt.starts_with("Live run: distance="), "prompt: {prompt}");
}

#[tokio::test(start_paused = true)]
async fn test_missing_credential_disables_live_coaching() {
    let llm = ScriptedLlm::new(Script::MissingKey);
    let coaching = CoachingService::new(llm.clone(), &LlmConfig::default());
    let h = spawn_run(quiet_settings(), Some(coaching));
    h.run.start(None).await.unwrap();

    sleep(Duration::from_secs(90)).await;

    assert_eq!(llm.call_count(), 1);
    assert_eq!(h.run.snapshot().await.unwrap().phase, RunPhase::Running);
}

#[tokio::test(start_paused = true)]
async fn test_provider_outage_skips_cue_and_retries_later() {
    let llm = ScriptedLlm::new(Script::Unavailable);
    let coaching = CoachingService::new(llm.clone(), &LlmConfig::default());
    let h = spawn_run(quiet_settings(), Some(coaching));
    h.run.start(None).await.unwrap();

    sleep(Duration::from_secs(50)).await;

    assert!(llm.call_count() >= 2);
    assert_eq!(h.speech.spoken(), vec![phrases::RUN_STARTED.to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn test_voice_off_silences_cues_and_coaching() {
    let llm = ScriptedLlm::replying("unused");
    let coaching = CoachingService::new(llm.clone(), &LlmConfig::default());
    let settings = RunnerSettings {
        voice_cues: false,
        ..quiet_settings()
    };
    let h = spawn_run(settings, Some(coaching));
    h.run.start(None).await.unwrap();

    feed(&h.source, 0, 20, 20.0, 4).await;
    assert!(h.run.stop().await.unwrap().is_some());

    assert!(h.speech.spoken().is_empty());
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pace_correction_uses_goal_pace_over_settings() {
    // 5 m/s is 3:20 per km; settings target is 4:40
    let h = spawn_run(quiet_settings(), None);
    h.run.start(None).await.unwrap();
    feed(&h.source, 0, 10, 20.0, 4).await;
    assert!(h
        .speech
        .spoken()
        .iter()
        .any(|s| s == "03:20 per kilometer. Ease off a little, you are running too fast."));

    let on_goal = spawn_run(quiet_settings(), None);
    on_goal
        .run
        .start(Some(Goal::Distance {
            target_km: 5.0,
            target_pace_sec_per_km: Some(200),
        }))
        .await
        .unwrap();
    feed(&on_goal.source, 0, 10, 20.0, 4).await;
    assert!(!on_goal
        .speech
        .spoken()
        .iter()
        .any(|s| s.contains("per kilometer")));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_ends_the_run() {
    let h = spawn_run(quiet_settings(), None);
    h.run.start(None).await.unwrap();
    let sink = h.source.current_sink().unwrap();

    drop(h.run);
    sleep(Duration::from_millis(10)).await;

    assert!(h.source.stop_count() >= 1);
    assert!(!sink.send(sample_at(0.0, 0)).await);
}

#[tokio::test(start_paused = true)]
async fn test_replay_source_feeds_whole_track() {
    init_test_logging();
    let store = memory_store();
    let speech = RecordingSpeech::new();
    let source = ReplaySource::new(straight_track(30, 15.0, 4_000), 10.0);
    let finished = source.finished();

    let run = RunController::spawn(RunContext {
        telemetry: TelemetryConfig::default(),
        cues: CueConfig::default(),
        settings: quiet_settings(),
        source: Box::new(source),
        speech,
        coaching: None,
        finalizer: finalizer(StubElevation::failing(), store.clone()),
    });
    run.start(None).await.unwrap();
    finished.notified().await;

    let session = run.stop().await.unwrap().unwrap();
    assert_eq!(session.path.len(), 30);
    assert!((session.distance_m - 435.0).abs() < 0.01);
    assert!(session.splits.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fast_replay_keeps_recorded_pace() {
    init_test_logging();
    let store = memory_store();
    // 116 s of recorded running over 435 m, about 4:27 per km
    let source = ReplaySource::new(straight_track(30, 15.0, 4_000), 10.0);
    let finished = source.finished();

    let run = RunController::spawn(RunContext {
        telemetry: TelemetryConfig::default(),
        cues: CueConfig::default(),
        settings: quiet_settings(),
        source: Box::new(source),
        speech: RecordingSpeech::new(),
        coaching: None,
        finalizer: finalizer(StubElevation::failing(), store.clone()),
    });
    run.start(None).await.unwrap();
    let wall_start = tokio::time::Instant::now();
    finished.notified().await;
    assert!(wall_start.elapsed() < Duration::from_secs(12));

    let session = run.stop().await.unwrap().unwrap();
    assert!(
        (114..=117).contains(&session.moving_time_s),
        "moving time {}",
        session.moving_time_s
    );
    assert!(
        (260.0..272.0).contains(&session.average_pace_sec_per_km),
        "pace {}",
        session.average_pace_sec_per_km
    );

    let saved = SessionRepository::new(store).list().await.unwrap();
    assert_eq!(saved[0].moving_time_s, session.moving_time_s);
}
