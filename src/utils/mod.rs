// ABOUTME: Utility modules shared by the network-facing collaborators
// ABOUTME: Contains the pooled HTTP client factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

/// HTTP client configuration and helpers
pub mod http_client;
