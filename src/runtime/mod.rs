// ABOUTME: Async run runtime: one task owns the tracker and serializes every input
// ABOUTME: Commands, samples, timers and coaching replies all flow through one queue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Run Runtime
//!
//! [`RunController::spawn`] starts a tokio task that owns the [`RunTracker`]
//! for one run. Everything that can change the run arrives as a
//! [`RunMessage`] on a single queue and is handled to completion before the
//! next one, so the tracker is never mutated concurrently:
//!
//! - commands from [`RunHandle`]
//! - location samples, tagged with the acquisition epoch they were produced in
//! - the one-second moving-time tick, cue polls and pace checks
//! - coaching texts produced by background requests
//!
//! Tearing down acquisition bumps the epoch, so samples still queued from
//! the previous acquisition are discarded instead of mutating the run.
//!
//! Timers and the run clock follow [`LocationSource::time_scale`]: a track
//! replayed ten times faster ticks moving time ten times per wall second.

pub mod location;

pub use location::{LocationSource, ReplaySource, SampleSink};

use std::sync::Arc;
use std::time::Duration;
use stride_core::models::{GeoSample, Goal, RunnerSettings, Session};
use stride_telemetry::TelemetryConfig;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::coach::CoachingService;
use crate::config::CueConfig;
use crate::cues::{phrases, CueScheduler, PaceCoach};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::finalizer::SessionFinalizer;
use crate::speech::{SpeechSink, VoiceGate};
use crate::tracker::{RunPhase, RunSnapshot, RunTracker, TrackerEvent, TransitionCause};

/// Capacity of the run queue
const QUEUE_CAPACITY: usize = 256;

/// Moving-time clock resolution
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Command sent by a [`RunHandle`]
#[derive(Debug)]
pub enum RunCommand {
    /// Start the run
    Start {
        /// Optional target
        goal: Option<Goal>,
        /// Outcome
        reply: oneshot::Sender<AppResult<()>>,
    },
    /// Manual pause
    Pause {
        /// Outcome
        reply: oneshot::Sender<AppResult<()>>,
    },
    /// Manual resume
    Resume {
        /// Outcome
        reply: oneshot::Sender<AppResult<()>>,
    },
    /// Stop and finalize
    Stop {
        /// Saved session, `None` when the run was too short
        reply: oneshot::Sender<AppResult<Option<Session>>>,
    },
    /// Read current metrics
    Snapshot {
        /// Current metrics
        reply: oneshot::Sender<RunSnapshot>,
    },
}

/// Everything the run task reacts to
#[derive(Debug)]
pub enum RunMessage {
    /// Command from a handle
    Command(RunCommand),
    /// Location sample from the acquisition started in `epoch`
    Sample {
        /// Acquisition epoch
        epoch: u64,
        /// Raw sample
        sample: GeoSample,
    },
    /// One second of run time elapsed
    Tick,
    /// Cue scheduler poll
    CuePoll,
    /// Pace deviation check
    PaceCheck,
    /// A background coaching request completed
    CueText(AppResult<String>),
}

/// Collaborators and settings for one run
pub struct RunContext {
    /// Telemetry thresholds
    pub telemetry: TelemetryConfig,
    /// Cue cadence
    pub cues: CueConfig,
    /// Runner preferences (auto-pause, voice, target pace)
    pub settings: RunnerSettings,
    /// Location acquisition
    pub source: Box<dyn LocationSource>,
    /// Speech output
    pub speech: Arc<dyn SpeechSink>,
    /// Live coaching, `None` to disable
    pub coaching: Option<CoachingService>,
    /// Session finalization
    pub finalizer: SessionFinalizer,
}

/// Client side of a running [`RunController`]
#[derive(Debug, Clone)]
pub struct RunHandle {
    tx: mpsc::Sender<RunMessage>,
}

impl RunHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RunCommand,
    ) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RunMessage::Command(build(reply)))
            .await
            .map_err(|_| AppError::internal("run controller has shut down"))?;
        response
            .await
            .map_err(|_| AppError::internal("run controller dropped the request"))
    }

    /// Start the run
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if already started, or the acquisition error
    /// if the location source cannot start.
    pub async fn start(&self, goal: Option<Goal>) -> AppResult<()> {
        self.request(|reply| RunCommand::Start { goal, reply }).await?
    }

    /// Pause the run
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless running or auto-paused.
    pub async fn pause(&self) -> AppResult<()> {
        self.request(|reply| RunCommand::Pause { reply }).await?
    }

    /// Resume the run
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless paused, or the acquisition error.
    pub async fn resume(&self) -> AppResult<()> {
        self.request(|reply| RunCommand::Resume { reply }).await?
    }

    /// Stop the run and wait for finalization
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless running or paused, or a storage error.
    pub async fn stop(&self) -> AppResult<Option<Session>> {
        self.request(|reply| RunCommand::Stop { reply }).await?
    }

    /// Current metrics
    ///
    /// # Errors
    ///
    /// Returns an internal error if the run task has exited.
    pub async fn snapshot(&self) -> AppResult<RunSnapshot> {
        self.request(|reply| RunCommand::Snapshot { reply }).await
    }
}

/// Run task state
pub struct RunController {
    tracker: RunTracker,
    source: Box<dyn LocationSource>,
    voice: VoiceGate,
    coaching: Option<CoachingService>,
    finalizer: SessionFinalizer,
    scheduler: CueScheduler,
    pace_coach: PaceCoach,
    cue_config: CueConfig,
    target_pace_sec_per_km: u32,
    epoch: u64,
    started_at: Instant,
    time_scale: f64,
    queue: mpsc::WeakSender<RunMessage>,
    in_flight: JoinSet<()>,
}

impl RunController {
    /// Spawn the run task
    #[must_use]
    pub fn spawn(context: RunContext) -> RunHandle {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let voice_enabled = context.settings.voice_cues;
        let time_scale = context.source.time_scale();
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            warn!(time_scale, "Ignoring invalid source time scale");
            1.0
        };
        let controller = Self {
            tracker: RunTracker::new(context.telemetry, context.settings.auto_pause),
            source: context.source,
            voice: VoiceGate::new(context.speech, voice_enabled),
            coaching: context.coaching,
            finalizer: context.finalizer,
            scheduler: CueScheduler::from_config(&context.cues),
            pace_coach: PaceCoach::from_config(&context.cues),
            cue_config: context.cues,
            target_pace_sec_per_km: context.settings.target_pace_sec_per_km,
            epoch: 0,
            started_at: Instant::now(),
            time_scale,
            queue: tx.downgrade(),
            in_flight: JoinSet::new(),
        };
        tokio::spawn(controller.run(rx));
        RunHandle { tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<RunMessage>) {
        let mut tick = timer(self.wall_period(TICK_PERIOD));
        let mut cue_poll = timer(self.wall_period(self.cue_config.poll_interval));
        let mut pace_check = timer(self.wall_period(self.cue_config.pace_check_interval));

        loop {
            let message = tokio::select! {
                received = rx.recv() => match received {
                    Some(message) => message,
                    None => break,
                },
                _ = tick.tick() => RunMessage::Tick,
                _ = cue_poll.tick() => RunMessage::CuePoll,
                _ = pace_check.tick() => RunMessage::PaceCheck,
                Some(_) = self.in_flight.join_next(), if !self.in_flight.is_empty() => continue,
            };

            if self.handle(message).await {
                self.drain_cues(&mut rx).await;
                break;
            }
        }

        self.source.stop().await;
        debug!("Run task finished");
    }

    /// Handle one message; `true` once the run has been stopped
    async fn handle(&mut self, message: RunMessage) -> bool {
        match message {
            RunMessage::Command(command) => return self.handle_command(command).await,
            RunMessage::Sample { epoch, sample } => {
                if epoch != self.epoch || !self.tracker.state().acquiring {
                    debug!(epoch, current = self.epoch, "Discarding stale sample");
                    return false;
                }
                self.tracker.handle_sample(sample);
                let _ = self.process_events().await;
            }
            RunMessage::Tick => {
                self.tracker.tick();
            }
            RunMessage::CuePoll => self.poll_cue(),
            RunMessage::PaceCheck => self.check_pace(),
            RunMessage::CueText(result) => self.deliver_cue(result),
        }
        false
    }

    async fn handle_command(&mut self, command: RunCommand) -> bool {
        match command {
            RunCommand::Start { goal, reply } => {
                let result = self.start(goal).await;
                let _ = reply.send(result);
            }
            RunCommand::Pause { reply } => {
                let result = self.tracker.pause();
                let _ = self.process_events().await;
                let _ = reply.send(result);
            }
            RunCommand::Resume { reply } => {
                let result = self.resume().await;
                let _ = reply.send(result);
            }
            RunCommand::Stop { reply } => {
                let finished = match self.tracker.stop() {
                    Ok(finished) => finished,
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        return false;
                    }
                };
                let _ = self.process_events().await;
                let result = self.finalizer.finalize(finished).await;
                if matches!(result, Ok(Some(_))) {
                    self.voice.say(phrases::RUN_SAVED);
                }
                let _ = reply.send(result);
                return true;
            }
            RunCommand::Snapshot { reply } => {
                let _ = reply.send(self.tracker.snapshot());
            }
        }
        false
    }

    async fn start(&mut self, goal: Option<Goal>) -> AppResult<()> {
        self.tracker.start(goal)?;
        if let Err(e) = self.process_events().await {
            warn!(error = %e, "Location acquisition failed, run not started");
            self.tracker =
                RunTracker::new(self.tracker.config(), self.tracker.auto_pause_enabled());
            return Err(e);
        }
        if let Some(pace) = goal.as_ref().and_then(Goal::target_pace) {
            self.target_pace_sec_per_km = pace;
        }
        self.scheduler.arm(self.now_ms(), 0.0);
        Ok(())
    }

    async fn resume(&mut self) -> AppResult<()> {
        self.tracker.resume()?;
        if let Err(e) = self.process_events().await {
            warn!(error = %e, "Location acquisition failed on resume");
            // Back to a manual pause; acquisition is already down
            let _ = self.tracker.pause();
            self.tracker.drain_events();
            return Err(e);
        }
        Ok(())
    }

    /// Apply the side effects queued by the tracker
    ///
    /// Acquisition changes run first; nothing is announced when acquisition
    /// fails to start.
    async fn process_events(&mut self) -> AppResult<()> {
        let events = self.tracker.drain_events();
        for event in &events {
            match event {
                TrackerEvent::AcquisitionChanged { active: true } => {
                    self.epoch += 1;
                    let sink = SampleSink::new(self.queue.clone(), self.epoch);
                    if let Err(e) = self.source.start(sink).await {
                        self.epoch += 1;
                        return Err(e);
                    }
                }
                TrackerEvent::AcquisitionChanged { active: false } => {
                    self.source.stop().await;
                    self.epoch += 1;
                }
                TrackerEvent::PhaseChanged { .. } | TrackerEvent::SplitRecorded(_) => {}
            }
        }

        for event in events {
            match event {
                TrackerEvent::PhaseChanged { from, to, cause } => {
                    self.announce_phase(from, to, cause);
                }
                TrackerEvent::SplitRecorded(split) => {
                    self.voice.say(&phrases::split(split.number, split.seconds));
                }
                TrackerEvent::AcquisitionChanged { .. } => {}
            }
        }
        Ok(())
    }

    fn announce_phase(&self, from: RunPhase, to: RunPhase, cause: TransitionCause) {
        let phrase = match (from, to) {
            (RunPhase::Idle, RunPhase::Running) => phrases::RUN_STARTED,
            (RunPhase::Running, RunPhase::Paused) => phrases::RUN_PAUSED,
            (RunPhase::Paused, RunPhase::Running) => phrases::RUN_RESUMED,
            _ => return,
        };
        debug!(?cause, "Announcing phase change");
        self.voice.say(phrase);
    }

    fn poll_cue(&mut self) {
        if self.tracker.phase() != RunPhase::Running || !self.voice.is_enabled() {
            return;
        }
        let Some(coaching) = self.coaching.clone() else {
            return;
        };
        let snapshot = self.tracker.snapshot();
        if !self.scheduler.poll(self.now_ms(), snapshot.distance_m) {
            return;
        }
        let Some(queue) = self.queue.upgrade() else {
            return;
        };
        self.in_flight.spawn(async move {
            let result = coaching.cue_for(&snapshot).await;
            let _ = queue.send(RunMessage::CueText(result)).await;
        });
    }

    fn check_pace(&mut self) {
        if self.tracker.phase() != RunPhase::Running {
            return;
        }
        let speed = self.tracker.state().smoothed_speed_mps;
        if let Some(cue) =
            self.pace_coach
                .check(self.now_ms(), speed, self.target_pace_sec_per_km)
        {
            info!(correction = ?cue.correction, gap_secs = cue.gap_secs, "Pace correction");
            self.voice.say(&cue.phrase());
        }
    }

    fn deliver_cue(&mut self, result: AppResult<String>) {
        match result {
            Ok(text) => self.voice.say(&text),
            Err(e) if e.code == ErrorCode::ConfigMissing => {
                warn!(error = %e, "Live coaching disabled");
                self.coaching = None;
            }
            Err(e) => debug!(error = %e, "Coaching cue skipped"),
        }
    }

    /// Wait for coaching requests started before stop and speak their text
    async fn drain_cues(&mut self, rx: &mut mpsc::Receiver<RunMessage>) {
        while self.in_flight.join_next().await.is_some() {}
        while let Ok(message) = rx.try_recv() {
            if let RunMessage::CueText(result) = message {
                self.deliver_cue(result);
            }
        }
    }

    /// Run-clock milliseconds since spawn
    fn now_ms(&self) -> u64 {
        (self.started_at.elapsed().as_millis() as f64 * self.time_scale) as u64
    }

    /// Wall-clock period covering `run_period` of run time
    fn wall_period(&self, run_period: Duration) -> Duration {
        run_period.div_f64(self.time_scale).max(Duration::from_millis(1))
    }
}

fn timer(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
