// ABOUTME: OpenAI-compatible chat completions client used for coaching text
// ABOUTME: Bearer-authenticated POST to chat/completions with error mapping to AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Works with `DeepSeek` (the default), `OpenAI`, Groq, Ollama and any other
//! endpoint implementing the chat completions API.
//!
//! ## Configuration
//!
//! - `STRIDE_LLM_BASE_URL`: Base URL (default: <https://api.deepseek.com/v1>)
//! - `STRIDE_LLM_MODEL`: Model to use (default: `deepseek-chat`)
//! - `STRIDE_LLM_API_KEY` or `DEEPSEEK_API_KEY`: Bearer credential
//!
//! The credential is only checked when a completion is requested, so the
//! rest of the application works without one.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::{environment, LlmConfig};
use crate::errors::{AppError, ErrorCode};
use crate::utils::http_client::llm_client;

/// Service label used in error messages
const SERVICE_NAME: &str = "CoachingText";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// `OpenAI`-compatible coaching text provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider with the given configuration
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: llm_client(),
            config,
        }
    }

    /// Create a provider with a caller-supplied HTTP client
    #[must_use]
    pub const fn with_client(config: LlmConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Create a provider from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LlmConfig::from_env())
    }

    /// Whether a credential is configured
    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Parse error response from API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |parsed| {
                let error_type = parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned());
                format!("{error_type} - {}", parsed.error.message)
            },
        );

        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{SERVICE_NAME}: authentication failed: {detail}"),
            ),
            429 | 502..=504 => AppError::external_unavailable(
                SERVICE_NAME,
                format!("service unavailable ({status}): {detail}"),
            ),
            _ => AppError::external_service(SERVICE_NAME, format!("API error ({status}): {detail}")),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AppError::config_missing(format!(
                "no coaching credential configured; set {} or {}",
                environment::LLM_API_KEY_ENV,
                environment::DEEPSEEK_API_KEY_ENV
            ))
        })?;

        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let payload = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature.or(Some(self.config.temperature)),
            max_tokens: request.max_tokens,
            stream: false,
        };
        debug!(messages = payload.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send coaching request: {}", e);
                AppError::external_unavailable(SERVICE_NAME, format!("failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read coaching response: {}", e);
            AppError::external_service(SERVICE_NAME, format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse coaching response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(SERVICE_NAME, format!("failed to parse response: {e}"))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "API returned no choices"))?;

        let content = choice
            .message
            .content
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "API returned empty content"))?;

        debug!(
            content_len = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received coaching response"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
