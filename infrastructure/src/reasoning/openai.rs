//! OpenAI-compatible chat completions client
//!
//! Sends each prompt as a single user message to `{endpoint}/chat/completions`
//! and returns the first choice's content. Works with any server speaking
//! that dialect (OpenAI, Azure-style proxies, Ollama, vLLM, LM Studio).

use std::time::Duration;

use async_trait::async_trait;
use magi_application::{ReasoningError, ReasoningPort};
use magi_domain::core::string::truncate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FileReasoningConfig;

/// Longest slice of an error body echoed into a [`ReasoningError`].
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One model on one OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiReasoning {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl OpenAiReasoning {
    /// Shared HTTP client honouring the configured timeout.
    pub fn http_client(config: &FileReasoningConfig) -> Result<Client, ReasoningError> {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReasoningError::Unavailable(format!("HTTP client: {}", e)))
    }

    /// Client for `model` on the configured endpoint. The API key is read
    /// from the environment variable named in the config, if it is set.
    pub fn new(client: Client, config: &FileReasoningConfig, model: impl Into<String>) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            debug!(env = %config.api_key_env, "No API key set, sending unauthenticated requests");
        }
        Self {
            client,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            model: model.into(),
            api_key,
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_transport_error(e: reqwest::Error) -> ReasoningError {
        if e.is_timeout() {
            ReasoningError::Timeout
        } else if e.is_connect() {
            ReasoningError::Unavailable(e.to_string())
        } else {
            ReasoningError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl ReasoningPort for OpenAiReasoning {
    async fn think(&self, prompt: &str) -> Result<String, ReasoningError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending reasoning request");
        let response = request.send().await.map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(model = %self.model, %status, "Reasoning request rejected");
            return Err(ReasoningError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                truncate(text.trim(), MAX_ERROR_BODY)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ReasoningError::InvalidResponse("response has no content".into()))?;

        debug!(model = %self.model, response_bytes = content.len(), "Reasoning response received");
        Ok(content)
    }
}
