// ABOUTME: Location acquisition port and a replay source for recorded tracks
// ABOUTME: Samples are pushed into the run queue tagged with the acquisition epoch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stride_core::models::GeoSample;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::RunMessage;
use crate::errors::{AppError, AppResult};

/// Push endpoint handed to a location source when acquisition starts
///
/// Holds only a weak reference to the run queue, so an abandoned source
/// cannot keep a finished run alive.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: mpsc::WeakSender<RunMessage>,
    epoch: u64,
}

impl SampleSink {
    pub(crate) const fn new(tx: mpsc::WeakSender<RunMessage>, epoch: u64) -> Self {
        Self { tx, epoch }
    }

    /// Acquisition epoch this sink belongs to
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Deliver a sample; `false` once the run is gone
    pub async fn send(&self, sample: GeoSample) -> bool {
        let Some(tx) = self.tx.upgrade() else {
            return false;
        };
        tx.send(RunMessage::Sample {
            epoch: self.epoch,
            sample,
        })
        .await
        .is_ok()
    }
}

/// Platform location service
#[async_trait]
pub trait LocationSource: Send {
    /// Begin delivering samples to the sink
    ///
    /// # Errors
    ///
    /// Returns `SensorUnavailable` or `PermissionDenied` when acquisition
    /// cannot start.
    async fn start(&mut self, sink: SampleSink) -> AppResult<()>;

    /// Stop delivering samples; must take effect immediately
    async fn stop(&mut self);

    /// Run seconds that pass per wall-clock second
    fn time_scale(&self) -> f64 {
        1.0
    }
}

/// Replays a recorded track, honouring the gaps between timestamps
pub struct ReplaySource {
    samples: Arc<Vec<GeoSample>>,
    speedup: f64,
    cursor: Arc<AtomicUsize>,
    finished: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    /// Replay `samples`, `speedup` times faster than recorded
    #[must_use]
    pub fn new(samples: Vec<GeoSample>, speedup: f64) -> Self {
        let speedup = if speedup.is_finite() && speedup > 0.0 {
            speedup
        } else {
            1.0
        };
        Self {
            samples: Arc::new(samples),
            speedup,
            cursor: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(Notify::new()),
            task: None,
        }
    }

    /// Load a `.json` (array of samples) or `.csv` (header row) track
    ///
    /// # Errors
    ///
    /// Returns `SensorUnavailable` when the file cannot be read or parsed,
    /// or holds no samples.
    pub async fn from_path(path: &Path, speedup: f64) -> AppResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::sensor_unavailable(format!("cannot read track {}: {e}", path.display()))
        })?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let samples = if is_csv {
            parse_csv(&text)?
        } else {
            parse_json(&text)?
        };
        if samples.is_empty() {
            return Err(AppError::sensor_unavailable(format!(
                "track {} contains no samples",
                path.display()
            )));
        }
        info!(path = %path.display(), samples = samples.len(), speedup, "Loaded replay track");
        Ok(Self::new(samples, speedup))
    }

    /// Number of samples in the track
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the track is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Notified once the last sample has been delivered
    #[must_use]
    pub fn finished(&self) -> Arc<Notify> {
        Arc::clone(&self.finished)
    }
}

#[async_trait]
impl LocationSource for ReplaySource {
    async fn start(&mut self, sink: SampleSink) -> AppResult<()> {
        if self.samples.is_empty() {
            return Err(AppError::sensor_unavailable("replay track is empty"));
        }
        self.stop().await;

        let samples = Arc::clone(&self.samples);
        let cursor = Arc::clone(&self.cursor);
        let finished = Arc::clone(&self.finished);
        let speedup = self.speedup;
        debug!(epoch = sink.epoch(), from = cursor.load(Ordering::SeqCst), "Replay started");

        self.task = Some(tokio::spawn(async move {
            let mut previous_ts: Option<i64> = None;
            loop {
                let index = cursor.load(Ordering::SeqCst);
                let Some(sample) = samples.get(index).copied() else {
                    finished.notify_one();
                    break;
                };
                if let Some(previous) = previous_ts {
                    let gap_secs = (sample.timestamp_ms - previous).max(0) as f64 / 1000.0 / speedup;
                    if gap_secs > 0.0 {
                        tokio::time::sleep(Duration::from_secs_f64(gap_secs)).await;
                    }
                }
                if !sink.send(sample).await {
                    break;
                }
                cursor.store(index + 1, Ordering::SeqCst);
                previous_ts = Some(sample.timestamp_ms);
            }
        }));
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Replay stopped");
        }
    }

    fn time_scale(&self) -> f64 {
        self.speedup
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Parse a JSON array of samples
///
/// # Errors
///
/// Returns `SensorUnavailable` when the document is not a sample array.
pub fn parse_json(text: &str) -> AppResult<Vec<GeoSample>> {
    serde_json::from_str(text)
        .map_err(|e| AppError::sensor_unavailable(format!("invalid JSON track: {e}")).with_source(e))
}

/// Parse CSV with a header row (`lat,lng,ts[,acc,ele,spd]`)
///
/// # Errors
///
/// Returns `SensorUnavailable` when a row cannot be decoded.
pub fn parse_csv(text: &str) -> AppResult<Vec<GeoSample>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<GeoSample>, _>>()
        .map_err(|e| AppError::sensor_unavailable(format!("invalid CSV track: {e}")).with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_optional_columns() {
        let text = "lat,lon,ts,acc,ele,spd\n45.0,7.0,1000,5,230.5,\n45.0001,7.0,2000,,,3.1\n";
        let samples = parse_csv(text).unwrap_or_default();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].accuracy_m, Some(5.0));
        assert_eq!(samples[0].speed_mps, None);
        assert_eq!(samples[1].altitude_m, None);
        assert_eq!(samples[1].speed_mps, Some(3.1));
    }

    #[test]
    fn test_parse_json_compact_keys() {
        let samples =
            parse_json(r#"[{"lat":1.0,"lng":2.0,"ts":5,"acc":4.0}]"#).unwrap_or_default();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp_ms, 5);
    }

    #[test]
    fn test_invalid_track_is_sensor_error() {
        let error = parse_json("{not json").err();
        assert_eq!(
            error.map(|e| e.code),
            Some(crate::errors::ErrorCode::SensorUnavailable)
        );
    }
}
