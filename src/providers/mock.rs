/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Answers every schema with a plausible record
 * - `MockProvider::failing()` - Always fails with an API error
 * - `MockProvider::malformed()` - Answers with text that is not JSON
 * - `MockProvider::slow(ms)` - Works, after a delay
 */

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, StructuredRequest, StructuredResponse};
use crate::transcript::TRANSCRIPT_TITLE;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds at the transport level but returns unparseable content
    Malformed,
    /// Simulates a slow response
    Slow { delay_ms: u64 },
}

/// Mock provider returning canned structured responses
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `complete` calls
    request_count: Arc<AtomicUsize>,
    /// Number of `test_connection` calls
    connection_checks: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<StructuredRequest>>>,
    /// Fixed answers keyed by schema name
    canned: Arc<Mutex<HashMap<String, String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            connection_checks: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            canned: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer requests for `schema_name` with a fixed content string
    pub fn with_response(self, schema_name: &str, content: impl Into<String>) -> Self {
        self.canned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_name.to_string(), content.into());
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of connection checks received so far
    pub fn connection_check_count(&self) -> usize {
        self.connection_checks.load(Ordering::SeqCst)
    }

    /// Copies of the requests received so far
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Transcript body without the title heading, joined into one paragraph
    pub fn clean_document(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != TRANSCRIPT_TITLE)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn analysis_value(transcript: &str) -> serde_json::Value {
        let excerpts: Vec<String> = transcript
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != TRANSCRIPT_TITLE)
            .take(3)
            .map(str::to_string)
            .collect();

        json!({
            "detailed_comprehensive_summary": format!("The video covers {} passages.", excerpts.len()),
            "tldr_summary": "A short video.",
            "video_section_titles": ["Introduction"],
            "key_insights": ["Mock insight"],
            "key_excerpts_long": excerpts,
            "sources_used_by_author": [],
            "detailed_bias_examination": "No bias detected by the mock.",
            "interesting_counterpoints": ["Mock counterpoint"]
        })
    }

    fn generate(request: &StructuredRequest) -> Result<String, ProviderError> {
        let value = match request.schema_name.as_str() {
            "sanitized_transcript" => json!({
                "clean_transcript": Self::clean_document(&request.user_content)
            }),
            "transcript_analysis" => json!({
                "summary_short": "Mock summary.",
                "video_analysis": Self::analysis_value(&request.user_content)
            }),
            "processed_transcript" => {
                let clean = Self::clean_document(&request.user_content);
                json!({
                    "summary_short": "Mock summary.",
                    "clean_transcript": clean,
                    "video_analysis": Self::analysis_value(&clean)
                })
            }
            other => {
                return Err(ProviderError::ParseError(format!("mock has no answer for schema {}", other)));
            }
        };
        Ok(value.to_string())
    }

    fn respond(&self, request: &StructuredRequest) -> Result<StructuredResponse, ProviderError> {
        let canned = self
            .canned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request.schema_name)
            .cloned();

        let content = match canned {
            Some(content) => content,
            None => Self::generate(request)?,
        };

        Ok(StructuredResponse {
            prompt_tokens: Some(request.user_content.len() as u64),
            completion_tokens: Some(content.len() as u64),
            content,
        })
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, request: StructuredRequest) -> Result<StructuredResponse, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match self.behavior {
            MockBehavior::Working => self.respond(&request),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated failure".to_string(),
            }),
            MockBehavior::Malformed => Ok(StructuredResponse {
                content: "I am sorry, I cannot produce JSON today.".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            }),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                self.respond(&request)
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.connection_checks.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }
}
