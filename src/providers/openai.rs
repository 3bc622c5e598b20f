use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use reqwest::Client;
use log::{debug, error};

use crate::errors::ProviderError;
use super::{Provider, StructuredRequest, StructuredResponse, http_client};

/// OpenAI client using chat completions with structured outputs
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Model used for every request
    model: String,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: Option<String>,

    /// Set when the model declines to answer in the requested format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    response_format: Value,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Single completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl OpenAIRequest {
    /// Build a strict JSON-schema request from a structured request
    pub fn from_structured(model: impl Into<String>, request: StructuredRequest) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: Some(request.system_prompt),
                    refusal: None,
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: Some(request.user_content),
                    refusal: None,
                },
            ],
            temperature: request.temperature,
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "schema": request.schema,
                    "strict": true
                }
            }),
        }
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/{}", base, path)
    }

    /// Send a chat completion request
    pub async fn send(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self.client.post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse OpenAI API response: {}", e)))
    }

    /// Extract the structured content from a completion
    pub fn extract_content(response: OpenAIResponse) -> Result<StructuredResponse, ProviderError> {
        let usage = response.usage;
        let choice = response.choices.into_iter().next()
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(ProviderError::ParseError(format!("model refused: {}", refusal)));
        }

        if choice.finish_reason.as_deref() == Some("length") {
            return Err(ProviderError::ParseError(
                "completion was truncated at the token limit".to_string(),
            ));
        }

        let content = choice.message.content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::ParseError("response message was empty".to_string()))?;

        Ok(StructuredResponse {
            content,
            prompt_tokens: usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens: usage.as_ref().map(|u| u.completion_tokens),
        })
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn complete(&self, request: StructuredRequest) -> Result<StructuredResponse, ProviderError> {
        let request = OpenAIRequest::from_structured(&self.model, request);
        debug!("Sending {} messages to OpenAI model {}", request.messages.len(), self.model);

        let response = self.send(&request).await?;
        Self::extract_content(response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.api_url("models"))
            .bearer_auth(&self.api_key)
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
