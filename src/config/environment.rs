// ABOUTME: Environment configuration parsing into strongly typed application settings
// ABOUTME: Reads STRIDE_* variables with defaults, clamping cadence and batch values to safe ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! Environment-based configuration management

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use stride_core::constants::{cues, elevation};
use stride_core::errors::{AppError, AppResult};
use stride_telemetry::TelemetryConfig;
use tracing::{info, warn};

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Directory holding persisted sessions, settings and chat history
pub const DATA_DIR_ENV: &str = "STRIDE_DATA_DIR";
/// Base URL of the OpenAI-compatible coaching endpoint
pub const LLM_BASE_URL_ENV: &str = "STRIDE_LLM_BASE_URL";
/// Model used for coaching text
pub const LLM_MODEL_ENV: &str = "STRIDE_LLM_MODEL";
/// Bearer credential for the coaching endpoint
pub const LLM_API_KEY_ENV: &str = "STRIDE_LLM_API_KEY";
/// Fallback credential variable understood for `DeepSeek` deployments
pub const DEEPSEEK_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Sampling temperature for coaching text
pub const LLM_TEMPERATURE_ENV: &str = "STRIDE_LLM_TEMPERATURE";
/// Elevation lookup endpoint
pub const ELEVATION_URL_ENV: &str = "STRIDE_ELEVATION_URL";
/// Points per elevation lookup request
pub const ELEVATION_BATCH_ENV: &str = "STRIDE_ELEVATION_BATCH";
/// Cue scheduler polling cadence (seconds)
pub const CUE_POLL_SECS_ENV: &str = "STRIDE_CUE_POLL_SECS";
/// Minimum time between coaching cues (seconds)
pub const CUE_INTERVAL_SECS_ENV: &str = "STRIDE_CUE_INTERVAL_SECS";
/// Distance between coaching cues (meters)
pub const CUE_DISTANCE_M_ENV: &str = "STRIDE_CUE_DISTANCE_M";
/// Pace check cadence (seconds)
pub const PACE_CHECK_SECS_ENV: &str = "STRIDE_PACE_CHECK_SECS";
/// Pace deviation tolerance (seconds per km)
pub const PACE_TOLERANCE_SECS_ENV: &str = "STRIDE_PACE_TOLERANCE_SECS";

/// Default coaching endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com/v1";
/// Default coaching model
pub const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
/// Default coaching temperature
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.2;

/// Name of the data directory created under the home directory
const DEFAULT_DATA_DIR_NAME: &str = ".stride";

// ============================================================================
// Configuration Types
// ============================================================================

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// Coaching-text service settings
    pub llm: LlmConfig,
    /// Elevation lookup settings
    pub elevation: ElevationConfig,
    /// Cue cadence settings
    pub cues: CueConfig,
    /// Telemetry thresholds
    pub telemetry: TelemetryConfig,
}

/// Coaching-text (LLM) endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL ending before `/chat/completions`
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer credential; absence only fails when a request is made
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Elevation lookup service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Lookup endpoint URL
    pub lookup_url: String,
    /// Points per request, at most 90
    pub batch_size: usize,
}

/// Cadence of the coaching cue scheduler and pace coach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueConfig {
    /// How often the scheduler is polled
    pub poll_interval: Duration,
    /// Minimum time between coaching requests
    pub min_interval: Duration,
    /// Distance that triggers a coaching request (meters)
    pub distance_trigger_m: f64,
    /// How often the pace deviation is checked
    pub pace_check_interval: Duration,
    /// Allowed pace deviation before a correction is spoken (seconds per km)
    pub pace_tolerance_secs: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_owned(),
            model: DEFAULT_LLM_MODEL.to_owned(),
            api_key: None,
            temperature: DEFAULT_LLM_TEMPERATURE,
        }
    }
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            lookup_url: elevation::DEFAULT_LOOKUP_URL.to_owned(),
            batch_size: elevation::MAX_BATCH_SIZE,
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(cues::POLL_INTERVAL_SECS),
            min_interval: Duration::from_secs(cues::MIN_INTERVAL_SECS),
            distance_trigger_m: cues::DISTANCE_TRIGGER_M,
            pace_check_interval: Duration::from_secs(cues::PACE_CHECK_INTERVAL_SECS),
            pace_tolerance_secs: cues::PACE_TOLERANCE_SECS,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no data directory is configured and
    /// the home directory cannot be determined.
    pub fn from_env() -> AppResult<Self> {
        let data_dir = match env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .map(|home| home.join(DEFAULT_DATA_DIR_NAME))
                .ok_or_else(|| {
                    AppError::config(format!(
                        "cannot determine home directory; set {DATA_DIR_ENV}"
                    ))
                })?,
        };

        let config = Self {
            data_dir,
            llm: LlmConfig::from_env(),
            elevation: ElevationConfig::from_env(),
            cues: CueConfig::from_env(),
            telemetry: TelemetryConfig::default(),
        };

        info!(
            data_dir = %config.data_dir.display(),
            llm.base_url = %config.llm.base_url,
            llm.model = %config.llm.model,
            llm.credential = config.llm.api_key.is_some(),
            elevation.batch = config.elevation.batch_size,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Configuration rooted at an explicit data directory, everything else default
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            llm: LlmConfig::default(),
            elevation: ElevationConfig::default(),
            cues: CueConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Load coaching endpoint configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = env::var(LLM_API_KEY_ENV)
            .or_else(|_| env::var(DEEPSEEK_API_KEY_ENV))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            base_url: env_var_or(LLM_BASE_URL_ENV, DEFAULT_LLM_BASE_URL),
            model: env_var_or(LLM_MODEL_ENV, DEFAULT_LLM_MODEL),
            api_key,
            temperature: parse_env_or(LLM_TEMPERATURE_ENV, DEFAULT_LLM_TEMPERATURE)
                .clamp(0.0, 2.0),
        }
    }
}

impl ElevationConfig {
    /// Load elevation service configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            lookup_url: env_var_or(ELEVATION_URL_ENV, elevation::DEFAULT_LOOKUP_URL),
            batch_size: parse_env_or(ELEVATION_BATCH_ENV, elevation::MAX_BATCH_SIZE)
                .clamp(1, elevation::MAX_BATCH_SIZE),
        }
    }
}

impl CueConfig {
    /// Load cue cadence from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                parse_env_or(CUE_POLL_SECS_ENV, cues::POLL_INTERVAL_SECS).max(1),
            ),
            min_interval: Duration::from_secs(parse_env_or(
                CUE_INTERVAL_SECS_ENV,
                cues::MIN_INTERVAL_SECS,
            )),
            distance_trigger_m: parse_env_or(CUE_DISTANCE_M_ENV, cues::DISTANCE_TRIGGER_M)
                .max(0.0),
            pace_check_interval: Duration::from_secs(
                parse_env_or(PACE_CHECK_SECS_ENV, cues::PACE_CHECK_INTERVAL_SECS).max(1),
            ),
            pace_tolerance_secs: parse_env_or(PACE_TOLERANCE_SECS_ENV, cues::PACE_TOLERANCE_SECS)
                .clamp(cues::MIN_PACE_TOLERANCE_SECS, cues::MAX_PACE_TOLERANCE_SECS),
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to the default when unset or invalid
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}
