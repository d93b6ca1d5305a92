//! Language model client
//!
//! Speaks the OpenAI chat-completions protocol (`POST <endpoint>/chat/completions`).
//! Any compatible server works; the endpoint and model come from configuration.

use async_trait::async_trait;
use rqa_common::config::LlmSettings;
use rqa_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Upper bound on one completion call
pub const MODEL_TIMEOUT: Duration = Duration::from_secs(30);

pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

/// Text generator used to synthesize answers
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a system + user prompt pair
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-compatible chat-completions client
pub struct OpenAiChatClient {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: &str, endpoint: &str, model: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(MODEL_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Client for resolved settings; `None` when no usable key is configured
    pub fn from_settings(settings: &LlmSettings) -> Result<Option<Self>> {
        settings
            .api_key
            .as_deref()
            .map(|key| Self::new(key, &settings.endpoint, &settings.model))
            .transpose()
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_prompt),
                ChatMessage::new("user", user_prompt),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.endpoint);
        debug!(url = %url, model = %self.model, "Requesting completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(Error::Http(format!(
                "language model returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid completion response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Http("no completion in response".to_string()))?;

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
