// ABOUTME: Open-Elevation lookup client (GET lookup?locations=lat,lng|lat,lng)
// ABOUTME: Maps transport, status and decoding failures to external service errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use stride_core::models::TrackPoint;
use tracing::{debug, instrument};

use super::ElevationProvider;
use crate::config::ElevationConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::http_client::shared_client;

const SERVICE_NAME: &str = "Open-Elevation";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    elevation: Option<f64>,
}

/// Client for an Open-Elevation compatible lookup endpoint
#[derive(Debug, Clone)]
pub struct OpenElevationClient {
    client: Client,
    lookup_url: String,
}

impl OpenElevationClient {
    /// Create a client from configuration
    #[must_use]
    pub fn new(config: &ElevationConfig) -> Self {
        Self {
            client: shared_client().clone(),
            lookup_url: config.lookup_url.clone(),
        }
    }

    /// Request URL for a batch
    #[must_use]
    pub fn request_url(&self, points: &[TrackPoint]) -> String {
        let locations = points
            .iter()
            .map(|p| format!("{},{}", p.lat, p.lng))
            .collect::<Vec<_>>()
            .join("|");
        format!(
            "{}?locations={}",
            self.lookup_url,
            urlencoding::encode(&locations)
        )
    }
}

#[async_trait]
impl ElevationProvider for OpenElevationClient {
    #[instrument(skip(self, points), fields(points = points.len()))]
    async fn lookup(&self, points: &[TrackPoint]) -> AppResult<Vec<Option<f64>>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.request_url(points))
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(SERVICE_NAME, format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!("HTTP {status}"),
            ));
        }

        let body: LookupResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("malformed response: {e}"))
        })?;

        debug!(received = body.results.len(), "Elevation batch received");
        Ok(body
            .results
            .into_iter()
            .map(|r| r.elevation.filter(|e| e.is_finite()))
            .collect())
    }
}
