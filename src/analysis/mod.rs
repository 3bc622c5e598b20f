/*!
 * Remote analysis of transcripts.
 *
 * This module coordinates the long-running structured-extraction calls:
 * - Response records and their JSON schemas (`models`)
 * - Instructions sent to the model (`prompts`)
 * - Token-based duration estimates (`tokens`)
 * - The cosmetic progress indicator thread (`progress`)
 * - The coordinator tying them together (`coordinator`)
 */

pub mod coordinator;
pub mod models;
pub mod progress;
pub mod prompts;
pub mod tokens;

// Re-export main types
pub use coordinator::{CoordinatorState, InferenceCoordinator};
pub use models::{
    AnalysisResponse, AnalysisResult, OutputArtifact, ProcessedTranscript, SanitizedTranscript,
    StructuredOutput,
};
pub use progress::{
    ProgressIndicator, run_with_progress, run_with_progress_async, with_indicator, with_indicator_async,
};
pub use tokens::{TokenCounter, estimate_duration};
