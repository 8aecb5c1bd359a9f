// ABOUTME: Chat command: asks the coach a question with persisted history
// ABOUTME: The latest saved session is attached as numeric context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Contributors

use anyhow::{bail, Result};
use std::sync::Arc;
use stride_coach::coach::CoachChat;
use stride_coach::llm::OpenAiCompatibleProvider;
use stride_coach::storage::{ChatLog, SessionRepository};

use crate::App;

/// Send one message and print the reply
pub async fn send(app: &App, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("message must not be empty");
    }

    let llm = &app.config.llm;
    let chat = CoachChat::new(
        Arc::new(OpenAiCompatibleProvider::new(llm.clone())),
        ChatLog::new(Arc::clone(&app.store)),
        SessionRepository::new(Arc::clone(&app.store)),
        llm,
    );

    let reply = chat.send(message.trim()).await?;
    println!("{reply}");
    Ok(())
}
