use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, trace};

use crate::errors::SubtitleError;

// @module: WebVTT caption track parsing

// @const: Blank-line block separator
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\n+").unwrap()
});

// @const: Inline cue markup (`<c>`, `<i>`, karaoke timestamps...)
static CUE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(?:c|i|b|u|v|lang|ruby|rt)(?:[.\s][^>]*)?>|<\d{2}:\d{2}(?::\d{2})?\.\d{3}>").unwrap()
});

// @const: Cue setting such as `align:start` or `position:0%`
static CUE_SETTING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:align|position|line|size|region|vertical):\S*$").unwrap()
});

// @struct: Single timed caption fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionFragment {
    // @field: Raw timing line (`00:00:01.000 --> 00:00:03.000 ...`)
    pub timing: String,

    // @field: Caption text, lines joined with a space
    pub text: String,
}

impl CaptionFragment {
    /// Creates a new caption fragment
    pub fn new(timing: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timing: timing.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for CaptionFragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.timing)?;
        writeln!(f, "{}", self.text)
    }
}

/// Parsed caption track with its origin
#[derive(Debug)]
pub struct CaptionTrack {
    /// File the track was read from
    pub source_file: PathBuf,

    /// Deduplicated fragments in order of first appearance
    pub fragments: Vec<CaptionFragment>,
}

impl CaptionTrack {
    /// Read and parse a caption file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let fragments = VttParser::parse_str(&content);

        debug!("Parsed {} caption fragments from {:?}", fragments.len(), path);

        Ok(Self {
            source_file: path.to_path_buf(),
            fragments,
        })
    }

    /// Video identifier encoded in the cache file name (`<id>.<lang>.vtt`)
    pub fn video_id(&self) -> Option<String> {
        self.source_file
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }
}

/// Parser for WebVTT-style caption documents
pub struct VttParser;

impl VttParser {
    /// Parse a caption document into ordered, deduplicated fragments.
    ///
    /// The first block is the header and is always skipped, whatever it
    /// contains. Blocks with fewer than two lines, with no text, or with only
    /// cue settings are dropped. Later blocks repeating an already emitted
    /// text are discarded. Malformed blocks never fail the document.
    pub fn parse_str(content: &str) -> Vec<CaptionFragment> {
        let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
        let content = content.trim();

        let mut fragments = Vec::new();
        let mut seen_texts: HashSet<String> = HashSet::new();

        for block in BLOCK_SEPARATOR.split(content).skip(1) {
            let Some(fragment) = Self::parse_block(block) else {
                continue;
            };

            if seen_texts.contains(&fragment.text) {
                trace!("Dropping repeated caption: {}", fragment.text);
                continue;
            }

            seen_texts.insert(fragment.text.clone());
            fragments.push(fragment);
        }

        fragments
    }

    // @parses: One blank-line separated block, None when it carries no caption
    fn parse_block(block: &str) -> Option<CaptionFragment> {
        let mut lines: Vec<&str> = block.lines().collect();
        if lines.len() < 2 {
            return None;
        }

        let first = lines[0].trim_start();
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
            return None;
        }

        // Optional cue identifier before the timing line
        if !lines[0].contains("-->") && lines[1].contains("-->") {
            lines.remove(0);
        }

        let timing = lines[0].trim().to_string();
        let joined = lines[1..].join(" ");
        let text = Self::strip_cue_tags(&joined).trim().to_string();

        if text.is_empty() || Self::is_cue_settings_only(&text) {
            return None;
        }

        Some(CaptionFragment { timing, text })
    }

    /// Remove inline cue markup, keeping the spoken words
    pub fn strip_cue_tags(text: &str) -> String {
        CUE_TAG_REGEX.replace_all(text, "").into_owned()
    }

    /// True when every token of the text is a positioning/alignment directive
    pub fn is_cue_settings_only(text: &str) -> bool {
        let mut tokens = text.split_whitespace().peekable();
        tokens.peek().is_some() && tokens.all(|token| CUE_SETTING_REGEX.is_match(token))
    }
}
