// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::ExtractionError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for the chat-completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: url::Url,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CompletionConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no API key is set, which disables the
    /// language-model extractor.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = env::var("COMPLETION_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };

        let base_url = env::var("COMPLETION_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let base_url = url::Url::parse(&base_url)
            .with_context(|| format!("COMPLETION_BASE_URL is not a valid URL: {base_url}"))?;

        let timeout_secs = env::var("COMPLETION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u64>()
            .context("COMPLETION_TIMEOUT_SECS must be a valid number")?;

        Ok(Some(Self {
            base_url,
            api_key,
            model: env::var("COMPLETION_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            temperature: 0.1,
            max_tokens: 250,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }

    fn chat_completions_url(&self) -> Result<url::Url> {
        self.base_url
            .join("/v1/chat/completions")
            .map_err(|e| anyhow!("Failed to build completions URL: {e}"))
    }
}

/// A single-turn completion: fixed instruction plus user text
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// Stateless request/response access to a language model
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the raw text of the model's reply
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractionError>;
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints
pub struct OpenAiCompletionClient {
    http: reqwest::Client,
    url: url::Url,
    config: CompletionConfig,
}

impl OpenAiCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .build()
            .context("Failed to build completion HTTP client")?;
        let url = config.chat_completions_url()?;

        Ok(Self { http, url, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractionError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractionError::Status { status, body });
        }

        let reply: ChatResponse = resp.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ExtractionError::EmptyReply)
    }
}
