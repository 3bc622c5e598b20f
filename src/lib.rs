/*!
 * # vidscribe - video captions to analyzed transcripts
 *
 * A Rust library that turns the caption track of an online video into a
 * cleaned transcript plus a structured analysis produced by an LLM.
 *
 * ## Features
 *
 * - Parse WebVTT caption files, dropping the rolling duplicates of auto captions
 * - Normalize caption fragments and assemble them into one document
 * - Clean and analyze the document with structured (JSON-schema) output:
 *   - OpenAI API
 *   - Ollama (local LLM)
 * - Token-based duration estimate with a terminal progress indicator
 * - One pretty-printed JSON artifact per run
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: WebVTT parsing into caption fragments
 * - `transcript`: Normalization, assembly and excerpt verification
 * - `analysis`: Remote calls:
 *   - `analysis::coordinator`: Estimate, indicator and call lifecycle
 *   - `analysis::progress`: Progress indicator thread
 *   - `analysis::tokens`: Token counting and duration estimates
 *   - `analysis::models`: Structured response records and schemas
 *   - `analysis::prompts`: Model instructions
 * - `pipeline`: Orchestration of a single run
 * - `fetcher`: External caption and transcript commands
 * - `providers`: Client implementations for the LLM services
 * - `file_utils`: File system operations
 * - `video_utils`: Video identifier extraction
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analysis;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod fetcher;
pub mod file_utils;
pub mod pipeline;
pub mod providers;
pub mod subtitle_processor;
pub mod transcript;
pub mod video_utils;

// Re-export main types for easier usage
pub use analysis::{InferenceCoordinator, OutputArtifact, ProcessedTranscript};
pub use app_config::{Config, PipelineMode};
pub use errors::{AppError, PipelineError, ProviderError, SubtitleError};
pub use pipeline::TranscriptPipeline;
pub use subtitle_processor::{CaptionFragment, CaptionTrack, VttParser};
pub use transcript::{DocumentAssembler, TextNormalizer, TranscriptDocument};
pub use video_utils::extract_video_id;
