// ABOUTME: Integration tests for environment-driven configuration
// ABOUTME: Defaults, overrides, credential precedence and invalid value fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use stride_coach::config::environment::{
    CUE_DISTANCE_M_ENV, CUE_INTERVAL_SECS_ENV, CUE_POLL_SECS_ENV, DATA_DIR_ENV,
    DEEPSEEK_API_KEY_ENV, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL, ELEVATION_BATCH_ENV,
    ELEVATION_URL_ENV, LLM_API_KEY_ENV, LLM_BASE_URL_ENV, LLM_MODEL_ENV, LLM_TEMPERATURE_ENV,
    PACE_CHECK_SECS_ENV, PACE_TOLERANCE_SECS_ENV,
};
use stride_coach::config::{AppConfig, CueConfig, ElevationConfig, LlmConfig};

const ALL_VARS: &[&str] = &[
    DATA_DIR_ENV,
    LLM_BASE_URL_ENV,
    LLM_MODEL_ENV,
    LLM_API_KEY_ENV,
    DEEPSEEK_API_KEY_ENV,
    LLM_TEMPERATURE_ENV,
    ELEVATION_URL_ENV,
    ELEVATION_BATCH_ENV,
    CUE_POLL_SECS_ENV,
    CUE_INTERVAL_SECS_ENV,
    CUE_DISTANCE_M_ENV,
    PACE_CHECK_SECS_ENV,
    PACE_TOLERANCE_SECS_ENV,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let llm = LlmConfig::from_env();
    assert_eq!(llm.base_url, DEFAULT_LLM_BASE_URL);
    assert_eq!(llm.model, DEFAULT_LLM_MODEL);
    assert!(llm.api_key.is_none());

    assert_eq!(ElevationConfig::from_env(), ElevationConfig::default());
    assert_eq!(ElevationConfig::default().batch_size, 90);

    let cues = CueConfig::from_env();
    assert_eq!(cues.poll_interval, Duration::from_secs(4));
    assert_eq!(cues.min_interval, Duration::from_secs(20));
    assert_eq!(cues.pace_check_interval, Duration::from_secs(30));
    assert!((cues.distance_trigger_m - 200.0).abs() < f64::EPSILON);
    assert!((cues.pace_tolerance_secs - 6.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_data_dir_override() {
    clear_env();
    env::set_var(DATA_DIR_ENV, "/tmp/stride-test-data");

    let config = AppConfig::from_env().unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/tmp/stride-test-data"));
    clear_env();
}

#[test]
#[serial]
fn test_blank_data_dir_falls_back_to_home() {
    clear_env();
    env::set_var(DATA_DIR_ENV, "   ");

    let config = AppConfig::from_env().unwrap();

    assert!(config.data_dir.ends_with(".stride"));
    clear_env();
}

#[test]
#[serial]
fn test_llm_overrides_and_credential_precedence() {
    clear_env();
    env::set_var(LLM_BASE_URL_ENV, "http://localhost:11434/v1");
    env::set_var(LLM_MODEL_ENV, "qwen2.5:14b");
    env::set_var(DEEPSEEK_API_KEY_ENV, "deepseek-key");

    let llm = LlmConfig::from_env();
    assert_eq!(llm.base_url, "http://localhost:11434/v1");
    assert_eq!(llm.model, "qwen2.5:14b");
    assert_eq!(llm.api_key.as_deref(), Some("deepseek-key"));

    env::set_var(LLM_API_KEY_ENV, "stride-key");
    assert_eq!(LlmConfig::from_env().api_key.as_deref(), Some("stride-key"));

    env::set_var(LLM_API_KEY_ENV, "  ");
    env::remove_var(DEEPSEEK_API_KEY_ENV);
    assert!(LlmConfig::from_env().api_key.is_none());
    clear_env();
}

#[test]
#[serial]
fn test_debug_output_redacts_credential() {
    clear_env();
    env::set_var(LLM_API_KEY_ENV, "sk-very-secret");

    let rendered = format!("{:?}", LlmConfig::from_env());

    assert!(!rendered.contains("sk-very-secret"));
    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_fall_back_to_defaults() {
    clear_env();
    env::set_var(LLM_TEMPERATURE_ENV, "warm");
    env::set_var(ELEVATION_BATCH_ENV, "lots");
    env::set_var(CUE_POLL_SECS_ENV, "-3");
    env::set_var(CUE_DISTANCE_M_ENV, "far");

    let llm = LlmConfig::from_env();
    let elevation = ElevationConfig::from_env();
    let cues = CueConfig::from_env();

    assert!((llm.temperature - LlmConfig::default().temperature).abs() < f32::EPSILON);
    assert_eq!(elevation.batch_size, 90);
    assert_eq!(cues.poll_interval, Duration::from_secs(4));
    assert!((cues.distance_trigger_m - 200.0).abs() < f64::EPSILON);
    clear_env();
}

#[test]
#[serial]
fn test_values_are_clamped_to_supported_ranges() {
    clear_env();
    env::set_var(ELEVATION_BATCH_ENV, "500");
    env::set_var(LLM_TEMPERATURE_ENV, "9.5");
    env::set_var(PACE_TOLERANCE_SECS_ENV, "30");
    env::set_var(PACE_CHECK_SECS_ENV, "0");

    assert_eq!(ElevationConfig::from_env().batch_size, 90);
    assert!((LlmConfig::from_env().temperature - 2.0).abs() < f32::EPSILON);
    let cues = CueConfig::from_env();
    assert!((cues.pace_tolerance_secs - 8.0).abs() < f64::EPSILON);
    assert_eq!(cues.pace_check_interval, Duration::from_secs(1));

    env::set_var(ELEVATION_BATCH_ENV, "25");
    env::set_var(ELEVATION_URL_ENV, "http://localhost:8080/api/v1/lookup");
    let elevation = ElevationConfig::from_env();
    assert_eq!(elevation.batch_size, 25);
    assert_eq!(elevation.lookup_url, "http://localhost:8080/api/v1/lookup");
    clear_env();
}

#[test]
fn test_with_data_dir_uses_defaults() {
    let config = AppConfig::with_data_dir("/var/lib/stride");

    assert_eq!(config.data_dir, PathBuf::from("/var/lib/stride"));
    assert_eq!(config.cues, CueConfig::default());
    assert!(config.llm.api_key.is_none());
}
