/*!
 * Checks that quoted excerpts actually occur in the transcript.
 *
 * Models paraphrase. An excerpt counts as verified when its normalized form
 * (lower-cased, punctuation dropped, whitespace collapsed) is a substring of
 * the normalized transcript.
 */

/// Normalized transcript text ready for repeated lookups
#[derive(Debug, Clone)]
pub struct ExcerptCheck {
    haystack: String,
}

impl ExcerptCheck {
    pub fn new(transcript: &str) -> Self {
        Self {
            haystack: normalize_for_match(transcript),
        }
    }

    /// Whether the excerpt can be found in the transcript
    pub fn is_verified(&self, excerpt: &str) -> bool {
        let needle = normalize_for_match(excerpt);
        !needle.is_empty() && self.haystack.contains(&needle)
    }
}

/// Excerpts that could not be located in the transcript
pub fn find_unverified_excerpts<'a>(transcript: &str, excerpts: &'a [String]) -> Vec<&'a str> {
    let check = ExcerptCheck::new(transcript);
    excerpts
        .iter()
        .map(String::as_str)
        .filter(|excerpt| !check.is_verified(excerpt))
        .collect()
}

fn normalize_for_match(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
