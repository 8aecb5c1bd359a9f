// ABOUTME: Elevation correction port used when a run is finalized
// ABOUTME: Splits a path into bounded batches and keeps results index-aligned with the input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

//! # Elevation Service
//!
//! Device altitude is noisy, so at stop the path is sent to a terrain
//! elevation lookup. The lookup is best effort: a failed or malformed batch
//! yields `None` for each of its points and never aborts finalization.

mod open_elevation;

pub use open_elevation::OpenElevationClient;

use async_trait::async_trait;
use stride_core::constants::elevation::MAX_BATCH_SIZE;
use stride_core::models::TrackPoint;
use tracing::{debug, warn};

use crate::errors::AppResult;

/// Terrain elevation lookup for one batch of points
#[async_trait]
pub trait ElevationProvider: Send + Sync {
    /// Elevations for the given points, in input order
    ///
    /// The response may be shorter or longer than the input; callers
    /// realign it.
    ///
    /// # Errors
    ///
    /// Returns an external service error when the lookup fails.
    async fn lookup(&self, points: &[TrackPoint]) -> AppResult<Vec<Option<f64>>>;
}

/// Corrected elevation for every point, `None` where unknown.
///
/// The output always has exactly `points.len()` entries.
pub async fn fetch_elevations(
    provider: &dyn ElevationProvider,
    points: &[TrackPoint],
    batch_size: usize,
) -> Vec<Option<f64>> {
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let mut elevations = Vec::with_capacity(points.len());

    for (index, batch) in points.chunks(batch_size).enumerate() {
        match provider.lookup(batch).await {
            Ok(mut values) => {
                if values.len() != batch.len() {
                    debug!(
                        batch = index,
                        expected = batch.len(),
                        received = values.len(),
                        "Realigning elevation batch"
                    );
                }
                values.resize(batch.len(), None);
                elevations.extend(values);
            }
            Err(e) => {
                warn!(batch = index, points = batch.len(), error = %e, "Elevation batch failed");
                elevations.extend(std::iter::repeat_n(None, batch.len()));
            }
        }
    }

    elevations
}
