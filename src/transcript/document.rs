use std::fmt;
use serde::{Deserialize, Serialize};

use super::normalizer::NormalizedFragment;

/// Heading placed on the first line of every assembled transcript
pub const TRANSCRIPT_TITLE: &str = "# Video Transcript";

// @struct: Assembled transcript text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptDocument(String);

impl TranscriptDocument {
    /// Wrap text that is already a complete transcript (raw transcript path)
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Body lines below the title heading
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.0
            .lines()
            .skip_while(|line| *line == TRANSCRIPT_TITLE || line.is_empty())
    }

    /// True when there is nothing besides the title
    pub fn has_content(&self) -> bool {
        self.body_lines().any(|line| !line.trim().is_empty())
    }

    /// Number of ASCII letters, used for before/after length reports
    pub fn letter_count(&self) -> usize {
        letter_count(&self.0)
    }
}

impl fmt::Display for TranscriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Count `[A-Za-z]` characters
pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Joins normalized fragments into one document
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Title line, blank line, then one fragment per line in input order
    pub fn assemble(&self, fragments: &[NormalizedFragment]) -> TranscriptDocument {
        let mut document = String::with_capacity(
            TRANSCRIPT_TITLE.len() + 2 + fragments.iter().map(|f| f.text().len() + 1).sum::<usize>(),
        );
        document.push_str(TRANSCRIPT_TITLE);
        document.push_str("\n\n");

        for fragment in fragments {
            document.push_str(fragment.text());
            document.push('\n');
        }

        TranscriptDocument(document.trim_end().to_string())
    }
}
