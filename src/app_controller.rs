use anyhow::{Result, Context, anyhow};
use log::{info, warn, debug};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

use crate::analysis::{InferenceCoordinator, OutputArtifact, ProcessedTranscript};
use crate::app_config::Config;
use crate::errors::{PipelineError, SubtitleError};
use crate::fetcher::{RawTranscriptFetcher, SubtitleFetcher};
use crate::file_utils::FileManager;
use crate::pipeline::TranscriptPipeline;
use crate::providers::{self, Provider};
use crate::transcript::TranscriptDocument;
use crate::video_utils::extract_video_id;

// @module: Application controller for transcript processing

/// Main application controller: fetch, process, write, report
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Model client shared by every remote call
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a controller with the provider selected by the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = providers::create_provider(&config)
            .context("Failed to create provider")?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create a controller around an already built provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Build the pipeline for one run
    pub fn pipeline(&self) -> TranscriptPipeline {
        let temperature = self
            .config
            .get_active_provider_config()
            .map(|p| p.temperature)
            .unwrap_or(0.0);

        let coordinator = InferenceCoordinator::new(Arc::clone(&self.provider))
            .with_temperature(temperature)
            .with_progress(self.config.show_progress);

        TranscriptPipeline::new(coordinator, self.config.pipeline_mode)
    }

    /// Check that the model service answers before any fetching starts
    ///
    /// A failed check is only reported; the run continues and the remote
    /// call surfaces the real error if the service stays unreachable.
    pub async fn check_provider(&self) -> bool {
        match self.provider.test_connection().await {
            Ok(()) => {
                info!("{} provider is reachable", self.provider.name());
                true
            }
            Err(e) => {
                warn!("{} provider connection check failed: {}", self.provider.name(), e);
                false
            }
        }
    }

    /// Run the whole workflow for one video URL and return the artifact path
    pub async fn run(&self, video_url: &str, output_file: Option<PathBuf>) -> Result<PathBuf> {
        let start_time = Instant::now();
        self.check_provider().await;

        let video_id = extract_video_id(video_url);
        match &video_id {
            Some(id) => info!("Video identifier: {}", id),
            None => warn!("Could not extract a video identifier from {}", video_url),
        }

        let path = if self.config.pipeline_mode.uses_captions() {
            // The temporary directory is removed when `_scratch` drops
            let (cache_dir, _scratch) = self.prepare_cache_dir()?;
            SubtitleFetcher::from_config(&self.config.fetcher)
                .download(video_url, &cache_dir)
                .await?;
            self.run_from_cache(&cache_dir, video_url, output_file).await?
        } else {
            let reference = video_id.as_deref().unwrap_or(video_url);
            let document = RawTranscriptFetcher::from_config(&self.config.fetcher)
                .fetch(reference)
                .await?;
            self.run_document(&document, video_url, video_id.as_deref(), output_file).await?
        };

        info!("Finished in {:.1} seconds", start_time.elapsed().as_secs_f64());
        Ok(path)
    }

    /// Process caption files already present in `cache_dir`
    ///
    /// Every caption file is converted and removed; the first one in
    /// file-name order is analyzed.
    pub async fn run_from_cache(&self, cache_dir: &Path, video_url: &str, output_file: Option<PathBuf>) -> Result<PathBuf> {
        let pipeline = self.pipeline();
        let mut converted = pipeline.convert_cache_dir(cache_dir)?;

        if converted.len() > 1 {
            debug!("{} caption tracks converted, analyzing the first", converted.len());
        }
        if converted.is_empty() {
            return Err(PipelineError::from(SubtitleError::EmptyTrack(video_url.to_string())).into());
        }
        let track = converted.swap_remove(0);

        let video_id = extract_video_id(video_url).or(track.video_id);
        self.write_processed(&pipeline, &track.document, video_url, video_id.as_deref(), output_file)
            .await
    }

    /// Process an assembled or raw document and write the artifact
    pub async fn run_document(
        &self,
        document: &TranscriptDocument,
        video_url: &str,
        video_id: Option<&str>,
        output_file: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let pipeline = self.pipeline();
        self.write_processed(&pipeline, document, video_url, video_id, output_file).await
    }

    async fn write_processed(
        &self,
        pipeline: &TranscriptPipeline,
        document: &TranscriptDocument,
        video_url: &str,
        video_id: Option<&str>,
        output_file: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let processed = pipeline.process_document(document).await?;

        let output_path = output_file
            .unwrap_or_else(|| FileManager::generate_output_path(&self.config.output_dir, video_id));

        let artifact = OutputArtifact::new(processed, video_url);
        Self::write_artifact(&artifact, &output_path)?;

        println!("{}", format_report(&artifact.transcript, &output_path));
        Ok(output_path)
    }

    /// Serialize the artifact as pretty JSON in one write
    pub fn write_artifact(artifact: &OutputArtifact, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(artifact)
            .context("Failed to serialize transcript artifact")?;
        FileManager::write_to_file(path, &json)?;
        info!("Saved transcript to {:?}", path);
        Ok(())
    }

    fn prepare_cache_dir(&self) -> Result<(PathBuf, Option<TempDir>)> {
        match &self.config.cache_dir {
            Some(dir) => {
                FileManager::ensure_dir(dir)?;
                Ok((dir.clone(), None))
            }
            None => {
                let scratch = tempfile::Builder::new()
                    .prefix("vidscribe")
                    .tempdir()
                    .map_err(|e| anyhow!("Failed to create cache directory: {}", e))?;
                Ok((scratch.path().to_path_buf(), Some(scratch)))
            }
        }
    }
}

/// Human-readable summary of a processed transcript
pub fn format_report(transcript: &ProcessedTranscript, output_path: &Path) -> String {
    let analysis = &transcript.video_analysis;
    let mut report = String::new();

    let _ = writeln!(report, "TLDR: {}", analysis.tldr_summary);
    let _ = writeln!(report, "\nShort summary:\n{}", transcript.summary_short);
    let _ = writeln!(report, "\nComprehensive summary:\n{}", analysis.detailed_comprehensive_summary);
    let _ = writeln!(report, "\nBias examination:\n{}", analysis.detailed_bias_examination);

    write_list(&mut report, "Key excerpts", &analysis.key_excerpts_long);
    write_list(&mut report, "Counterpoints", &analysis.interesting_counterpoints);
    write_list(&mut report, "Key insights", &analysis.key_insights);
    write_list(&mut report, "Sources", &analysis.sources_used_by_author);

    let _ = write!(report, "\nSaved to {}", output_path.display());
    report
}

fn write_list(report: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(report, "\n{}:", heading);
    if items.is_empty() {
        let _ = writeln!(report, "  (none)");
    }
    for item in items {
        let _ = writeln!(report, "  - {}", item);
    }
}
