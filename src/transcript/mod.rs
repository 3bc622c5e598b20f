/*!
 * Transcript construction from caption fragments.
 *
 * This module turns parsed caption fragments into a single document:
 * - Deterministic per-fragment cleanup (`normalizer`)
 * - Assembly into one titled, newline-joined document (`document`)
 * - Excerpt verification against the assembled text (`excerpts`)
 */

pub mod document;
pub mod excerpts;
pub mod normalizer;

// Re-export main types
pub use document::{DocumentAssembler, TranscriptDocument, TRANSCRIPT_TITLE};
pub use excerpts::{ExcerptCheck, find_unverified_excerpts};
pub use normalizer::{NormalizedFragment, TextNormalizer};
