use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OpenAiSettings;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Chat completion client for an OpenAI-compatible endpoint. Built once from
/// validated settings and handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    user_agent: String,
}

impl AiClient {
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow!("Base URL cannot be empty"));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            user_agent: format!("agcommit/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %request.model, "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("User-Agent", &self.user_agent)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat completions endpoint")?;

        match response.status() {
            reqwest::StatusCode::OK => response
                .json::<ChatCompletionResponse>()
                .await
                .context("Failed to parse chat completion response JSON"),
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let error_text = response.text().await.unwrap_or_default();
                Err(anyhow!(
                    "Too many requests. Please wait before trying again. (API response: {})",
                    error_text
                ))
            }
            reqwest::StatusCode::UNAUTHORIZED => Err(anyhow!(
                "Invalid API key. Run 'agcommit config set openai.api_key <KEY>' to update it."
            )),
            reqwest::StatusCode::BAD_REQUEST => {
                let error_text = response.text().await.unwrap_or_default();
                Err(anyhow!("Invalid request: {}", error_text))
            }
            reqwest::StatusCode::INTERNAL_SERVER_ERROR
            | reqwest::StatusCode::SERVICE_UNAVAILABLE => Err(anyhow!(
                "Service is temporarily unavailable. Please try again later."
            )),
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(anyhow!("API error (status {}): {}", status, error_text))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}
