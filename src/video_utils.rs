//! Video URL utilities
//!
//! This module extracts the 11-character video identifier from the URL
//! shapes the long-form video platform hands out: canonical watch pages,
//! short links, embeds and shorts.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Length of a platform video identifier
pub const VIDEO_ID_LEN: usize = 11;

static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap()
});

// Last-resort scan for URLs the parser rejects
static LOOSE_VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap()
});

const CANONICAL_HOSTS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "www.youtube-nocookie.com",
];

const SHORT_HOSTS: [&str; 2] = ["youtu.be", "www.youtu.be"];

const PATH_PREFIXES: [&str; 4] = ["embed", "shorts", "v", "live"];

/// Check whether a string has the shape of a video identifier
pub fn is_valid_video_id(candidate: &str) -> bool {
    VIDEO_ID_REGEX.is_match(candidate)
}

/// Extract the video identifier from a URL, `None` if no pattern matches
pub fn extract_video_id(raw_url: &str) -> Option<String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)));

    if let Ok(url) = parsed {
        if let Some(id) = video_id_from_url(&url) {
            return Some(id);
        }
    }

    LOOSE_VIDEO_ID_REGEX
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn video_id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if SHORT_HOSTS.contains(&host.as_str()) {
        segments.next().map(str::to_string)
    } else if CANONICAL_HOSTS.contains(&host.as_str()) {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some(prefix) if PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    } else {
        None
    };

    candidate.filter(|id| is_valid_video_id(id))
}
