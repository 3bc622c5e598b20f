/*!
 * Prompt templates for transcript cleanup and analysis.
 *
 * The distribution and length requirements below are instructions to the
 * model only; responses are not checked against them.
 */

/// Minimum number of long excerpts requested from the model
pub const MIN_KEY_EXCERPTS: usize = 10;

/// Target length of the comprehensive summary, in words
pub const SUMMARY_TARGET_WORDS: usize = 1000;

/// System prompt templates
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Cleanup-only instructions
    pub const SANITIZER: &'static str = r#"Your job is to convert video subtitles to a nicely formatted transcript.

## Input
- Auto-generated or author-provided subtitles, one caption per line, under a title heading
- The text contains missing punctuation, transcription errors and other artifacts

## Rules
- Some words may be wrong due to transcription errors; fix them selectively using the context of the video
- Keep every piece of spoken content, in the original order
- Do not summarize, shorten or add commentary
- Keep `[profanity]` markers as they are

## Output Requirements
- Return ONLY valid JSON matching the requested schema
- `clean_transcript` holds the full cleaned transcript as well-formatted paragraphs"#;

    /// Analysis-only instructions
    pub const ANALYST: &'static str = r#"You are given the transcript of a video. Produce a short summary and a thorough analysis of it.

## Analysis Fields
- `summary_short`: two or three sentences
- `detailed_comprehensive_summary`: about {summary_words} words covering the whole video
- `tldr_summary`: a single plain-language sentence
- `video_section_titles`: titles for the major sections, in order
- `key_insights`: the most important ideas
- `key_excerpts_long`: at least {min_excerpts} long verbatim quotes, spread evenly from the beginning to the end of the video
- `sources_used_by_author`: studies, books, people or data the author relies on
- `detailed_bias_examination`: framing, omissions and one-sidedness in the presentation
- `interesting_counterpoints`: arguments a critic would raise

## Quoting
- Excerpts must be copied word for word from the transcript
- Do not merge distant passages into one excerpt

## Output Requirements
- Return ONLY valid JSON matching the requested schema"#;

    /// Cleanup and analysis in one call
    pub const FUSED: &'static str = r#"Your job is to convert video subtitles to a nicely formatted transcript and then analyze the video.

## Transcript
- The input subtitles contain missing punctuation, transcription errors and other artifacts that you must clean
- Some words may be wrong due to transcription errors; fix them selectively using the context of the video
- `clean_transcript` must be well formatted and contain all of the spoken content

## Analysis Fields
- `summary_short`: two or three sentences
- `detailed_comprehensive_summary`: about {summary_words} words covering the whole video
- `tldr_summary`: a single plain-language sentence
- `video_section_titles`: titles for the major sections, in order
- `key_insights`: the most important ideas
- `key_excerpts_long`: at least {min_excerpts} long verbatim quotes from the clean transcript, spread evenly from the beginning to the end of the video
- `sources_used_by_author`: studies, books, people or data the author relies on
- `detailed_bias_examination`: framing, omissions and one-sidedness in the presentation
- `interesting_counterpoints`: arguments a critic would raise

## Output Requirements
- Return ONLY valid JSON matching the requested schema"#;

    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    pub fn sanitizer() -> Self {
        Self::new(Self::SANITIZER)
    }

    pub fn analyst() -> Self {
        Self::new(Self::ANALYST)
    }

    pub fn fused() -> Self {
        Self::new(Self::FUSED)
    }

    /// Render the template with the configured targets
    pub fn render(&self) -> String {
        self.template
            .replace("{summary_words}", &SUMMARY_TARGET_WORDS.to_string())
            .replace("{min_excerpts}", &MIN_KEY_EXCERPTS.to_string())
    }
}
