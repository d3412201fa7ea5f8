//! Commit message generation on top of the chat completion client.

mod prompt;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::warn;

use crate::client::{AiClient, ChatChoice, ChatCompletionRequest, ChatMessage, ChatMessageRole};
use crate::config::CommitSettings;

pub use prompt::build_system_prompt;

#[async_trait]
pub trait CommitMessageGenerator {
    async fn generate(&self, diff: &str) -> Result<String>;
}

/// Generator backed by an [`AiClient`].
pub struct AiCommitGenerator {
    client: AiClient,
    settings: CommitSettings,
}

impl AiCommitGenerator {
    pub fn new(client: AiClient, settings: CommitSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl CommitMessageGenerator for AiCommitGenerator {
    async fn generate(&self, diff: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.client.model().to_string(),
            messages: vec![
                ChatMessage {
                    role: ChatMessageRole::System,
                    content: build_system_prompt(&self.settings),
                },
                ChatMessage {
                    role: ChatMessageRole::User,
                    content: diff.to_string(),
                },
            ],
            max_tokens: None,
            temperature: Some(0.2),
        };

        let response = self.client.chat_completion(request).await?;
        let (message, choice) = response
            .choices
            .iter()
            .map(|choice| (clean_message(&choice.message.content), choice))
            .find(|(message, _)| !message.is_empty())
            .ok_or_else(|| anyhow!("The model returned an empty commit message"))?;

        if is_truncated(choice) {
            warn!("commit message was cut off by the model's token limit");
        }
        Ok(message)
    }
}

/// `finish_reason: "length"` means the reply hit the token limit.
fn is_truncated(choice: &ChatChoice) -> bool {
    choice.finish_reason.as_deref() == Some("length")
}

/// Drops `<think>` blocks, code fences, and surrounding quotes some models
/// wrap around the message.
pub fn clean_message(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    while let Some(start) = cleaned.find("<think>") {
        match cleaned[start..].find("</think>") {
            Some(end) => cleaned.replace_range(start..start + end + "</think>".len(), ""),
            None => cleaned.truncate(start),
        }
    }

    let trimmed = cleaned.trim();
    let unfenced = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(|inner| inner.split_once('\n').map_or(inner, |(_, body)| body))
        .unwrap_or(trimmed);

    unfenced.trim().trim_matches('"').trim().to_string()
}

#[cfg(test)]
mod tests;
