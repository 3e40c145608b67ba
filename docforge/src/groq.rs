#![doc = "Groq model client: implements the core `LanguageModel` seam over Groq's OpenAI-compatible chat-completions API."]
//
//! # Model client (CLI <-> Core)
//!
//! The core pipeline only knows [`LanguageModel::submit`]. This module binds a
//! model identifier and an API key into [`GroqClient`] and speaks the
//! chat-completions wire format:
//!
//! - `POST {endpoint}` with bearer authentication
//! - body `{ "model": ..., "messages": [{ "role": "user", "content": prompt }] }`
//! - reply text taken from `choices[0].message.content`
//!
//! Any transport failure, non-2xx status or reply without content becomes a
//! [`ModelError`]; the pipeline tags it with the stage that failed.

use async_trait::async_trait;
use docforge_core::{LanguageModel, ModelError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Builds the request body for a single user prompt.
pub fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    }
}

/// Pulls the first choice's message content out of a response body.
pub fn parse_completion(body: &str) -> Result<String, ModelError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Malformed chat-completions response");
        format!("malformed chat-completions response: {e}")
    })?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| "chat-completions response contained no message content".into())
}

pub struct GroqClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = GroqClient {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        };
        tracing::info!(
            model = %client.model,
            api_key_set = !client.api_key.is_empty(),
            "Initialized GroqClient"
        );
        client
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn submit(&self, prompt: &str) -> Result<String, ModelError> {
        tracing::info!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Submitting chat completion"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_request(&self.model, prompt))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, endpoint = %self.endpoint, "Chat completion request failed");
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(
                status = %status,
                endpoint = %self.endpoint,
                "Chat completion returned error. Response body: {body}"
            );
            return Err(format!("chat completion failed with status {status}: {body}").into());
        }

        let content = parse_completion(&body)?;
        tracing::info!(response_len = content.len(), "Chat completion succeeded");
        Ok(content)
    }
}
