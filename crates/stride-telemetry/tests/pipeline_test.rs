// ABOUTME: Integration tests chaining filter, fusion, accumulation and split detection
// ABOUTME: Exercises the telemetry stages the way the run tracker composes them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use stride_core::models::{GeoSample, TrackPoint};
use stride_telemetry::{
    path_distance, Accumulator, SampleFilter, SpeedFusion, SplitDetector, TelemetryConfig,
};

/// Minimal driver mirroring the order used by the run tracker
struct Pipeline {
    filter: SampleFilter,
    fusion: SpeedFusion,
    detector: SplitDetector,
    accumulator: Accumulator,
    path: Vec<TrackPoint>,
    splits: Vec<u64>,
    smoothed: f64,
}

impl Pipeline {
    fn new() -> Self {
        let config = TelemetryConfig::default();
        Self {
            filter: SampleFilter::from_config(&config),
            fusion: SpeedFusion::from_config(&config),
            detector: SplitDetector::from_config(&config),
            accumulator: Accumulator::from_config(&config),
            path: Vec::new(),
            splits: Vec::new(),
            smoothed: 0.0,
        }
    }

    fn push(&mut self, sample: GeoSample) -> bool {
        if !self.filter.accept(&sample, self.path.last()) {
            return false;
        }
        if let Some(prev) = self.path.last().copied() {
            self.smoothed = self.fusion.fuse(&prev, &sample, self.smoothed).smoothed_mps;
            self.accumulator.add_segment(&prev, &sample);
            let moving = ((sample.timestamp_ms - self.path[0].timestamp_ms) / 1000) as u64;
            self.detector
                .detect(self.accumulator.distance_m(), moving, &mut self.splits);
        }
        self.path.push(sample);
        true
    }
}

fn northward(count: usize, step_deg: f64, step_ms: i64) -> Vec<GeoSample> {
    (0..count)
        .map(|i| GeoSample::new(i as f64 * step_deg, 0.0, i as i64 * step_ms).with_accuracy(5.0))
        .collect()
}

#[test]
fn test_clean_samples_all_accepted_in_order() {
    let mut pipeline = Pipeline::new();
    let samples = northward(50, 0.000_05, 2_000);
    for sample in &samples {
        assert!(pipeline.push(*sample));
    }
    assert_eq!(pipeline.path, samples);
}

#[test]
fn test_distance_monotonic_and_deterministic() {
    let mut pipeline = Pipeline::new();
    let mut last = 0.0;
    for sample in northward(200, 0.000_09, 3_000) {
        pipeline.push(sample);
        assert!(pipeline.accumulator.distance_m() >= last);
        last = pipeline.accumulator.distance_m();
    }
    let first = path_distance(&pipeline.path);
    let second = path_distance(&pipeline.path);
    assert!((first - second).abs() < f64::EPSILON);
    assert!((first - pipeline.accumulator.distance_m()).abs() < 1e-6);
}

#[test]
fn test_split_count_tracks_whole_kilometers() {
    let mut pipeline = Pipeline::new();
    for sample in northward(400, 0.000_09, 3_000) {
        pipeline.push(sample);
        let expected = (pipeline.accumulator.distance_m() / 1000.0).floor() as usize;
        assert_eq!(pipeline.splits.len(), expected);
    }
    assert!(pipeline.splits.len() >= 3);
}

#[test]
fn test_smoothed_speed_bounded_with_absurd_device_speed() {
    let mut pipeline = Pipeline::new();
    let samples = (0..40).map(|i| {
        GeoSample::new(f64::from(i) * 0.001, 0.0, i64::from(i) * 1_000).with_speed(250.0)
    });
    for sample in samples {
        pipeline.push(sample);
        assert!((0.0..=9.0).contains(&pipeline.smoothed));
    }
}
