/*!
 * Per-fragment text cleanup.
 *
 * Rules run in a fixed order: whitespace collapse, terminal punctuation,
 * leading capital, profanity mask, `&nbsp;` removal. The rule chain is
 * re-applied until the text stops changing, which keeps `normalize`
 * idempotent even when a late rule exposes work for an earlier one.
 */

use crate::subtitle_processor::CaptionFragment;

/// Placeholder auto-captions use for masked words
pub const PROFANITY_MASK: &str = "[ __ ]";

/// Replacement written in place of `PROFANITY_MASK`
pub const PROFANITY_MARKER: &str = "[profanity]";

/// Escaped non-breaking space left over from HTML-ish caption sources
pub const NBSP_ESCAPE: &str = "&nbsp;";

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Caption fragment whose text went through `TextNormalizer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFragment {
    timing: String,
    text: String,
}

impl NormalizedFragment {
    /// Original timing line
    pub fn timing(&self) -> &str {
        &self.timing
    }

    /// Cleaned text
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Deterministic text cleanup rules
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one fragment, keeping its timing
    pub fn normalize_fragment(&self, fragment: CaptionFragment) -> NormalizedFragment {
        NormalizedFragment {
            text: Self::normalize(&fragment.text),
            timing: fragment.timing,
        }
    }

    /// Normalize every fragment, preserving order
    pub fn normalize_all(&self, fragments: Vec<CaptionFragment>) -> Vec<NormalizedFragment> {
        fragments
            .into_iter()
            .map(|fragment| self.normalize_fragment(fragment))
            .collect()
    }

    /// Apply the cleanup rules to a piece of caption text
    pub fn normalize(text: &str) -> String {
        let mut current = Self::apply_rules(text);
        loop {
            let next = Self::apply_rules(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn apply_rules(text: &str) -> String {
        let text = Self::collapse_whitespace(text);
        let text = Self::add_punctuation(text);
        let text = Self::capitalize_first(text);
        let text = Self::mask_profanity(text);
        Self::strip_nbsp(text)
    }

    /// Collapse whitespace runs (newlines included) to single spaces and trim
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Append a period unless the text already ends in `.`, `!` or `?`
    pub fn add_punctuation(mut text: String) -> String {
        if !text.is_empty() && !text.ends_with(TERMINAL_PUNCTUATION) {
            text.push('.');
        }
        text
    }

    /// Upper-case the first character
    pub fn capitalize_first(text: String) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) if !first.is_uppercase() => {
                first.to_uppercase().chain(chars).collect()
            }
            _ => text,
        }
    }

    pub fn mask_profanity(text: String) -> String {
        if text.contains(PROFANITY_MASK) {
            text.replace(PROFANITY_MASK, PROFANITY_MARKER)
        } else {
            text
        }
    }

    pub fn strip_nbsp(text: String) -> String {
        if text.contains(NBSP_ESCAPE) {
            text.replace(NBSP_ESCAPE, "")
        } else {
            text
        }
    }
}
