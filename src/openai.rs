//! OpenAI Responses API client.

use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Everything the completion service needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API key was configured; raised when the client is constructed.
    #[error("OpenAI API key is not configured.")]
    MissingCredential,

    #[error("request to OpenAI failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OpenAI API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode OpenAI response: {0}")]
    Decode(String),
}

/// A text-generation backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run a single completion and return the generated text (untrimmed).
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Client for `POST {base_url}/responses`.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client from config. Fails eagerly when the key is missing.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CompletionError::MissingCredential)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ResponsesRequest {
            model: &request.model,
            input: vec![
                InputMessage {
                    role: "system",
                    content: &request.system,
                },
                InputMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
        };

        debug!(
            "Sending request to OpenAI: model={} user_chars={}",
            request.model,
            request.user.chars().count()
        );

        let response = self
            .client
            .post(self.responses_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let response: ResponsesResponse =
            serde_json::from_str(&raw).map_err(|e| CompletionError::Decode(e.to_string()))?;

        if let Some(usage) = &response.usage {
            info!(
                "OpenAI response: {} tokens (input: {}, output: {})",
                usage.total_tokens, usage.input_tokens, usage.output_tokens
            );
        }

        Ok(response.output_text())
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<Usage>,
}

impl ResponsesResponse {
    /// Concatenation of every `output_text` part of every message item.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
    total_tokens: u32,
}
