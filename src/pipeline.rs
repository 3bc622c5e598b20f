use std::fs;
use std::path::Path;
use log::{debug, error, info, warn};

use crate::analysis::{InferenceCoordinator, ProcessedTranscript};
use crate::app_config::PipelineMode;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{CaptionFragment, CaptionTrack};
use crate::transcript::{DocumentAssembler, TextNormalizer, TranscriptDocument, find_unverified_excerpts};
use crate::transcript::document::letter_count;

// @module: Caption-to-analysis pipeline orchestration

/// Extension of the caption files produced by the downloader
pub const CAPTION_EXTENSION: &str = "vtt";

/// Transcript assembled from one cached caption file
#[derive(Debug, Clone)]
pub struct ConvertedTrack {
    /// Identifier taken from the cache file name
    pub video_id: Option<String>,

    pub document: TranscriptDocument,
}

/// Sequences parsing, normalization, assembly and the remote calls
#[derive(Debug)]
pub struct TranscriptPipeline {
    // @field: Remote call coordinator
    coordinator: InferenceCoordinator,

    // @field: Call composition
    mode: PipelineMode,

    normalizer: TextNormalizer,
    assembler: DocumentAssembler,
}

impl TranscriptPipeline {
    pub fn new(coordinator: InferenceCoordinator, mode: PipelineMode) -> Self {
        Self {
            coordinator,
            mode,
            normalizer: TextNormalizer::new(),
            assembler: DocumentAssembler::new(),
        }
    }

    /// Normalize parsed fragments and join them into one document
    pub fn prepare_document(&self, fragments: Vec<CaptionFragment>) -> TranscriptDocument {
        let normalized = self.normalizer.normalize_all(fragments);
        self.assembler.assemble(&normalized)
    }

    /// Convert every cached caption file into a document, then delete it
    ///
    /// Files are visited in file-name order. A file that cannot be read or
    /// parsed is logged and skipped; the cache file is removed either way.
    pub fn convert_cache_dir<P: AsRef<Path>>(&self, cache_dir: P) -> Result<Vec<ConvertedTrack>, PipelineError> {
        let cache_dir = cache_dir.as_ref();
        let mut files = FileManager::find_files(cache_dir, CAPTION_EXTENSION)
            .map_err(|e| PipelineError::Fetch(format!("cannot scan {:?}: {}", cache_dir, e)))?;
        files.sort();

        debug!("Found {} caption files in {:?}", files.len(), cache_dir);

        let mut converted = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match CaptionTrack::from_file(&path) {
                Ok(track) => {
                    let video_id = track.video_id();
                    let document = self.prepare_document(track.fragments);
                    info!("Converted {} ({} letters)", name, document.letter_count());
                    converted.push(ConvertedTrack { video_id, document });
                }
                Err(e) => error!("Error processing {}: {}", name, e),
            }

            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove {}: {}", name, e);
            }
        }

        Ok(converted)
    }

    /// Clean and analyze an assembled document according to the pipeline mode
    pub async fn process_document(&self, document: &TranscriptDocument) -> Result<ProcessedTranscript, PipelineError> {
        if !document.has_content() {
            return Err(PipelineError::NoTranscript);
        }

        info!("Processing transcript in {} mode ({} remote calls)", self.mode, self.mode.remote_calls());

        let processed = match self.mode {
            PipelineMode::SanitizeThenAnalyze => {
                let sanitized = self.coordinator.sanitize(document).await?;
                let analysis = self.coordinator.analyze(&sanitized.clean_transcript).await?;
                ProcessedTranscript::from_parts(sanitized.clean_transcript, analysis)
            }
            PipelineMode::Fused => self.coordinator.sanitize_and_analyze(document).await?,
            PipelineMode::AnalyzeRaw => {
                let analysis = self.coordinator.analyze(document.as_str()).await?;
                ProcessedTranscript::from_parts(document.as_str().to_string(), analysis)
            }
        };

        info!(
            "Input length: {} letters. Cleaned transcript length: {} letters",
            document.letter_count(),
            letter_count(&processed.clean_transcript)
        );

        let unverified = find_unverified_excerpts(
            &processed.clean_transcript,
            &processed.video_analysis.key_excerpts_long,
        );
        for excerpt in &unverified {
            warn!("Excerpt not found in transcript: {}", excerpt);
        }

        Ok(processed)
    }
}
