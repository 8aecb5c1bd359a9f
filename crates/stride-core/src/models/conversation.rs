// ABOUTME: Coach chat history entries persisted in the key-value store
// ABOUTME: One record per user question or coach answer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    /// The runner
    User,
    /// The coach
    Assistant,
}

/// One message of the persisted coach chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Who wrote the message
    pub role: ConversationRole,
    /// Message text
    pub content: String,
    /// When the message was recorded
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    /// Create an entry timestamped now
    #[must_use]
    pub fn new(role: ConversationRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
