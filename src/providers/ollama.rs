use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{debug, error};

use crate::errors::ProviderError;
use super::{Provider, StructuredRequest, StructuredResponse, http_client};

/// Ollama client for interacting with a local Ollama server
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model used for every request
    model: String,
    /// Context window requested per call, server default when unset
    context_window: Option<u32>,
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("context_window", &self.context_window)
            .finish_non_exhaustive()
    }
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant, or tool)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Context window size
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// JSON schema constraining the answer
    format: Value,
    /// Additional model parameters
    options: GenerationOptions,
    /// Whether to stream the response
    stream: bool,
}

/// Chat response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl ChatRequest {
    /// Build a schema-constrained chat request
    pub fn from_structured(
        model: impl Into<String>,
        request: StructuredRequest,
        context_window: Option<u32>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: request.system_prompt },
                ChatMessage { role: "user".to_string(), content: request.user_content },
            ],
            format: request.schema,
            options: GenerationOptions {
                temperature: Some(request.temperature),
                num_ctx: context_window,
            },
            stream: false,
        }
    }
}

impl Ollama {
    /// Create a new Ollama client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.into(),
            client: http_client(timeout),
            model: model.into(),
            context_window: None,
        }
    }

    /// Set the context window sent as `num_ctx`
    pub fn with_context_window(mut self, context_window: Option<u32>) -> Self {
        self.context_window = context_window;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Send a chat request
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self.client.post(self.api_url("chat"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response.json::<ChatResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", e)))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn complete(&self, request: StructuredRequest) -> Result<StructuredResponse, ProviderError> {
        let request = ChatRequest::from_structured(&self.model, request, self.context_window);
        debug!("Sending chat request to Ollama model {}", self.model);

        let response = self.chat(&request).await?;
        if !response.done {
            return Err(ProviderError::ParseError("Ollama returned an unfinished response".to_string()));
        }

        Ok(StructuredResponse {
            content: response.message.content,
            prompt_tokens: response.prompt_eval_count,
            completion_tokens: response.eval_count,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.api_url("tags"))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::from_status(status.as_u16(), message))
        }
    }
}
