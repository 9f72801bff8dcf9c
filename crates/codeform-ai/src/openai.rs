//! OpenAI-compatible chat completion client.
//!
//! Used by the relay: it sends the prompt with the caller's own key and hands back the
//! service's JSON untouched, so the form can read `choices` or `error` itself.

use codeform_core::{CodeformConfig, CodeformError, Credential, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Chat completion client for one upstream endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_seconds: u64,
}

/// OpenAI chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat message.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Status and body as returned by the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl CompletionClient {
    /// Create a client from the workspace configuration.
    pub fn new(config: &CodeformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CodeformError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_seconds: config.timeout_seconds,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask for a completion of `prompt`, authenticating with `key`.
    ///
    /// Non-2xx replies are not errors here: their JSON (usually an `error` object) is
    /// returned as-is. Only transport failures and non-JSON bodies fail.
    #[instrument(skip(self, prompt, key), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: &str, key: &Credential) -> Result<UpstreamReply> {
        let api_request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", key.expose()))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CodeformError::Network(format!(
                        "completion service timed out after {} seconds",
                        self.timeout_seconds
                    ))
                } else {
                    CodeformError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CodeformError::Network(e.to_string()))?;
        debug!(status, body_len = text.len(), "completion service replied");

        let body = serde_json::from_str(&text).map_err(|_| {
            CodeformError::Upstream(format!(
                "completion service returned a non-JSON body (HTTP {})",
                status
            ))
        })?;

        Ok(UpstreamReply { status, body })
    }
}
