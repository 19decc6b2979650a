//! OpenAI-compatible chat-completion client.
//!
//! Every relay endpoint goes through here. The relay makes exactly one
//! outbound call per request and never retries; upstream failures keep their
//! status and body so handlers can pass them through to the caller.

use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::dtos::ChatMessage;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Server is not configured: missing AI_API_KEY")]
    NotConfigured,

    #[error("Upstream returned {status}")]
    Upstream { status: StatusCode, body: String },

    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    config: UpstreamConfig,
}

impl CompletionClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Check if the upstream credential is present.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one chat completion and return the first choice's content.
    ///
    /// A missing or null `content` becomes an empty string; the upstream
    /// contract only promises `choices[0].message`.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(CompletionError::NotConfigured)?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature,
        };
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Upstream returned an error");
            return Err(CompletionError::Upstream { status, body });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    /// Probe the upstream by listing models, which validates both the base
    /// URL and the credential without spending tokens.
    pub async fn list_models(&self) -> Result<(), CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(CompletionError::NotConfigured)?;

        let url = format!("{}/models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CompletionError::Upstream { status, body })
        }
    }
}

// ============================================================================
// Chat Completion Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
