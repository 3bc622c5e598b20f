use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Record that a structured-extraction call can return
pub trait StructuredOutput: DeserializeOwned {
    /// Schema name sent with the request
    const SCHEMA_NAME: &'static str;

    /// Strict JSON schema describing the record
    fn schema() -> Value;
}

/// Analytical summary of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub detailed_comprehensive_summary: String,
    pub tldr_summary: String,
    pub video_section_titles: Vec<String>,
    pub key_insights: Vec<String>,
    pub key_excerpts_long: Vec<String>,
    pub sources_used_by_author: Vec<String>,
    pub detailed_bias_examination: String,
    pub interesting_counterpoints: Vec<String>,
}

impl AnalysisResult {
    fn schema() -> Value {
        let string_list = json!({ "type": "array", "items": { "type": "string" } });
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "detailed_comprehensive_summary": { "type": "string" },
                "tldr_summary": { "type": "string" },
                "video_section_titles": string_list,
                "key_insights": string_list,
                "key_excerpts_long": string_list,
                "sources_used_by_author": string_list,
                "detailed_bias_examination": { "type": "string" },
                "interesting_counterpoints": string_list
            },
            "required": [
                "detailed_comprehensive_summary",
                "tldr_summary",
                "video_section_titles",
                "key_insights",
                "key_excerpts_long",
                "sources_used_by_author",
                "detailed_bias_examination",
                "interesting_counterpoints"
            ]
        })
    }
}

/// Answer of the sanitize-only call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedTranscript {
    pub clean_transcript: String,
}

impl StructuredOutput for SanitizedTranscript {
    const SCHEMA_NAME: &'static str = "sanitized_transcript";

    fn schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "clean_transcript": { "type": "string" }
            },
            "required": ["clean_transcript"]
        })
    }
}

/// Answer of the analyze-only call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub summary_short: String,
    pub video_analysis: AnalysisResult,
}

impl StructuredOutput for AnalysisResponse {
    const SCHEMA_NAME: &'static str = "transcript_analysis";

    fn schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "summary_short": { "type": "string" },
                "video_analysis": AnalysisResult::schema()
            },
            "required": ["summary_short", "video_analysis"]
        })
    }
}

/// Final transcript record, identical whichever call composition produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedTranscript {
    pub summary_short: String,
    pub clean_transcript: String,
    pub video_analysis: AnalysisResult,
}

impl ProcessedTranscript {
    /// Combine the answers of a sanitize call and an analyze call
    pub fn from_parts(clean_transcript: String, analysis: AnalysisResponse) -> Self {
        Self {
            summary_short: analysis.summary_short,
            clean_transcript,
            video_analysis: analysis.video_analysis,
        }
    }
}

impl StructuredOutput for ProcessedTranscript {
    const SCHEMA_NAME: &'static str = "processed_transcript";

    fn schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "summary_short": { "type": "string" },
                "clean_transcript": { "type": "string" },
                "video_analysis": AnalysisResult::schema()
            },
            "required": ["summary_short", "clean_transcript", "video_analysis"]
        })
    }
}

/// JSON document written once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    #[serde(flatten)]
    pub transcript: ProcessedTranscript,

    /// URL the transcript was produced from
    pub source_url: String,
}

impl OutputArtifact {
    pub fn new(transcript: ProcessedTranscript, source_url: impl Into<String>) -> Self {
        Self {
            transcript,
            source_url: source_url.into(),
        }
    }
}
