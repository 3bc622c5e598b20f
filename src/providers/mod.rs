/*!
 * Provider implementations for structured-extraction services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - OpenAI: chat completions with strict JSON-schema output
 * - Ollama: local server with schema-constrained output
 * - Mock: canned responses for tests
 */

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, ProviderKind};
use crate::errors::ProviderError;

/// Request for a schema-constrained completion
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Instructions for the model
    pub system_prompt: String,

    /// Document the model works on
    pub user_content: String,

    /// Schema identifier sent alongside the schema
    pub schema_name: String,

    /// JSON schema the answer must conform to
    pub schema: Value,

    /// Sampling temperature
    pub temperature: f32,
}

/// Raw structured answer from a provider
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// JSON text produced by the model
    pub content: String,

    /// Prompt tokens reported by the service
    pub prompt_tokens: Option<u64>,

    /// Completion tokens reported by the service
    pub completion_tokens: Option<u64>,
}

/// Common trait for all LLM providers
///
/// Providers are injected into the inference coordinator as
/// `Arc<dyn Provider>`, which lets tests substitute a canned implementation.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Provider name for log lines
    fn name(&self) -> &str;

    /// Complete a structured request
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<StructuredResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: StructuredRequest) -> Result<StructuredResponse, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Time allowed for establishing a connection to the service
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the remote providers.
///
/// Only the connection phase is bounded unless an overall timeout is
/// configured; a long-running completion is never cut off otherwise.
pub fn http_client(timeout: Option<Duration>) -> reqwest::Client {
    let builder = reqwest::Client::builder().connect_timeout(CONNECT_TIMEOUT);
    let builder = match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    builder.build().unwrap_or_default()
}

/// Build the provider selected by the configuration
pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>, ProviderError> {
    let model = config.get_model();
    let endpoint = config.get_endpoint();
    let provider_config = config.get_active_provider_config();
    let timeout = provider_config
        .and_then(|p| p.timeout_secs)
        .map(Duration::from_secs);

    match config.provider {
        ProviderKind::OpenAI => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(ProviderError::AuthenticationError(
                    "missing OpenAI API key".to_string(),
                ));
            }
            Ok(Arc::new(openai::OpenAI::new(api_key, endpoint, model, timeout)))
        }
        ProviderKind::Ollama => {
            let context_window = provider_config.and_then(|p| p.context_window);
            Ok(Arc::new(
                ollama::Ollama::new(endpoint, model, timeout).with_context_window(context_window),
            ))
        }
    }
}

pub mod mock;
pub mod ollama;
pub mod openai;
