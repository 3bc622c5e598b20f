//! Token counting and duration estimates for remote calls.
//!
//! Tokens are counted with the `o200k_base` encoding used by the GPT-4o
//! model family, so counts are stable and deterministic.

use once_cell::sync::Lazy;
use tiktoken_rs::CoreBPE;

/// Observed throughput samples for the default model, tokens per second
pub const THROUGHPUT_SAMPLES: [f64; 5] = [183.0, 112.0, 80.0, 140.0, 100.0];

/// Prompt and completion are both paid for, so the raw estimate is doubled
pub const PROMPT_AND_COMPLETION_FACTOR: f64 = 2.0;

// The encoding ranks are compiled into the tokenizer crate
static ENCODING: Lazy<CoreBPE> = Lazy::new(|| tiktoken_rs::o200k_base().expect("bundled o200k_base encoding"));

/// Tokenizer for the target model family
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenCounter;

impl TokenCounter {
    pub fn new() -> Self {
        Self
    }

    /// Number of tokens the text encodes to
    pub fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        ENCODING.encode_ordinary(text).len()
    }
}

/// Mean of the throughput samples
pub fn average_throughput() -> f64 {
    THROUGHPUT_SAMPLES.iter().sum::<f64>() / THROUGHPUT_SAMPLES.len() as f64
}

/// Estimated seconds for a call over `token_count` tokens
pub fn estimate_duration_for_tokens(token_count: usize) -> u64 {
    let seconds = token_count as f64 / average_throughput() * PROMPT_AND_COMPLETION_FACTOR;
    seconds.round().max(0.0) as u64
}

/// Estimated seconds for a call over `text`; a UX hint, never a deadline
pub fn estimate_duration(text: &str) -> u64 {
    estimate_duration_for_tokens(TokenCounter::new().count(text))
}
