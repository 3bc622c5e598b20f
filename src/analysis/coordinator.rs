use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use log::{debug, info, trace};

use crate::errors::PipelineError;
use crate::providers::{Provider, StructuredRequest};
use crate::transcript::TranscriptDocument;

use super::models::{AnalysisResponse, ProcessedTranscript, SanitizedTranscript, StructuredOutput};
use super::progress::{ProgressIndicator, with_indicator_async};
use super::prompts::PromptTemplate;
use super::tokens::{TokenCounter, estimate_duration_for_tokens};

// @module: Coordination of long-running structured-extraction calls

/// Lifecycle of a coordinator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Estimating,
    Running,
    Completed,
    Failed,
}

/// Issues structured-extraction requests with a duration estimate and progress indicator
///
/// One call is expected in flight at a time. The remote call is never
/// cancelled or timed out by the estimate.
#[derive(Debug)]
pub struct InferenceCoordinator {
    // @field: Injected model client
    provider: Arc<dyn Provider>,

    // @field: Sampling temperature for every request
    temperature: f32,

    // @field: Draw the indicator to stderr (hidden otherwise)
    show_progress: bool,

    token_counter: TokenCounter,

    state: Mutex<CoordinatorState>,
}

impl InferenceCoordinator {
    /// Create a coordinator around an injected provider
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            temperature: 0.0,
            show_progress: true,
            token_counter: TokenCounter::new(),
            state: Mutex::new(CoordinatorState::Idle),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Current lifecycle state; `Completed` or `Failed` until the next call starts
    pub fn state(&self) -> CoordinatorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, next: CoordinatorState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        trace!("Coordinator state {:?} -> {:?}", *state, next);
        *state = next;
    }

    /// Estimated seconds a call over `text` will take
    pub fn estimate_duration(&self, text: &str) -> u64 {
        estimate_duration_for_tokens(self.token_counter.count(text))
    }

    /// Clean transcription noise without analyzing
    pub async fn sanitize(&self, document: &TranscriptDocument) -> Result<SanitizedTranscript, PipelineError> {
        self.extract(PromptTemplate::sanitizer(), document.as_str()).await
    }

    /// Analyze an already clean transcript
    pub async fn analyze(&self, transcript: &str) -> Result<AnalysisResponse, PipelineError> {
        self.extract(PromptTemplate::analyst(), transcript).await
    }

    /// Clean and analyze in a single call
    pub async fn sanitize_and_analyze(&self, document: &TranscriptDocument) -> Result<ProcessedTranscript, PipelineError> {
        self.extract(PromptTemplate::fused(), document.as_str()).await
    }

    /// Run one structured-extraction call and parse its answer into `T`
    pub async fn extract<T: StructuredOutput>(&self, template: PromptTemplate, input: &str) -> Result<T, PipelineError> {
        self.transition(CoordinatorState::Idle);
        self.transition(CoordinatorState::Estimating);

        let estimated = self.estimate_duration(input);
        info!("Estimated processing time: {} seconds", estimated);

        let request = StructuredRequest {
            system_prompt: template.render(),
            user_content: input.to_string(),
            schema_name: T::SCHEMA_NAME.to_string(),
            schema: T::schema(),
            temperature: self.temperature,
        };
        debug!(
            "Requesting {} from {} ({} characters)",
            T::SCHEMA_NAME,
            self.provider.name(),
            input.len()
        );

        let estimate = Duration::from_secs(estimated);
        let indicator = if self.show_progress {
            ProgressIndicator::start(estimate, &format!("Querying {}", self.provider.name()))
        } else {
            ProgressIndicator::hidden(estimate)
        };

        self.transition(CoordinatorState::Running);
        let started = Instant::now();
        let outcome = with_indicator_async(indicator, self.provider.complete(request)).await;
        info!("Actual processing time: {} seconds", started.elapsed().as_secs_f64().round());

        let parsed = outcome
            .map_err(PipelineError::from)
            .and_then(|response| {
                if let (Some(prompt), Some(completion)) = (response.prompt_tokens, response.completion_tokens) {
                    debug!("Token usage: {} prompt, {} completion", prompt, completion);
                }
                parse_structured::<T>(&response.content)
            });

        self.transition(if parsed.is_ok() {
            CoordinatorState::Completed
        } else {
            CoordinatorState::Failed
        });

        parsed
    }
}

/// Deserialize a model answer, tolerating a Markdown code fence around the JSON
pub fn parse_structured<T: StructuredOutput>(content: &str) -> Result<T, PipelineError> {
    let payload = strip_code_fence(content);
    serde_json::from_str(payload)
        .map_err(|e| PipelineError::InvalidResponse(format!("{}: {}", T::SCHEMA_NAME, e)))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
