// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides the pooled client for elevation lookups and a longer-timeout client for coaching text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared HTTP client with default configuration
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Request timeout of the shared client (seconds)
const SHARED_TIMEOUT_SECS: u64 = 30;
/// Connect timeout of the shared client (seconds)
const SHARED_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Get or create the shared HTTP client with default settings
///
/// This client uses connection pooling and reasonable timeouts.
/// Prefer this over creating new clients for better performance.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        create_client_with_timeout(SHARED_TIMEOUT_SECS, SHARED_CONNECT_TIMEOUT_SECS)
    })
}

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("stride-coach/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Create a new HTTP client for text generation calls
///
/// Completions can take noticeably longer than lookups.
#[must_use]
pub fn llm_client() -> Client {
    create_client_with_timeout(60, 10) // 60s request timeout, 10s connect timeout
}
