use std::path::Path;
use log::{debug, error, info};
use tokio::process::Command;

use crate::app_config::FetcherConfig;
use crate::errors::PipelineError;
use crate::transcript::TranscriptDocument;

// @module: External subtitle and transcript collaborators

/// Placeholder substituted in raw transcript arguments
pub const VIDEO_PLACEHOLDER: &str = "{video}";

// @struct: Caption downloader wrapper (yt-dlp compatible command line)
#[derive(Debug, Clone)]
pub struct SubtitleFetcher {
    command: String,
    languages: Vec<String>,
}

impl SubtitleFetcher {
    pub fn new(command: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            command: command.into(),
            languages,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.subtitle_command.clone(), config.subtitle_languages.clone())
    }

    /// Arguments that write WebVTT captions for `url` into `cache_dir`
    pub fn download_args(&self, url: &str, cache_dir: &Path) -> Vec<String> {
        let template = cache_dir.join("%(id)s.%(ext)s");
        vec![
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            self.languages.join(","),
            "--sub-format".to_string(),
            "vtt".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }

    /// Download the caption files for `url` into `cache_dir`
    pub async fn download(&self, url: &str, cache_dir: &Path) -> Result<(), PipelineError> {
        info!("Downloading captions for {}", url);
        let args = self.download_args(url, cache_dir);
        run_command(&self.command, &args).await.map(|_| ())
    }
}

// @struct: Raw transcript command wrapper
#[derive(Debug, Clone)]
pub struct RawTranscriptFetcher {
    command: String,
    args: Vec<String>,
}

impl RawTranscriptFetcher {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.raw_transcript_command.clone(), config.raw_transcript_args.clone())
    }

    /// Arguments with the video reference substituted
    pub fn command_args(&self, video: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(VIDEO_PLACEHOLDER, video))
            .collect()
    }

    /// Fetch the raw transcript for a video identifier (or URL)
    pub async fn fetch(&self, video: &str) -> Result<TranscriptDocument, PipelineError> {
        info!("Fetching raw transcript for {}", video);
        let args = self.command_args(video);
        let stdout = run_command(&self.command, &args).await?;
        Ok(TranscriptDocument::from_raw(stdout))
    }
}

// @runs: External command, returning stdout on success
async fn run_command(command: &str, args: &[String]) -> Result<String, PipelineError> {
    debug!("Running {} {}", command, args.join(" "));

    let output = Command::new(command)
        .args(args)
        .output()
        .await
        .map_err(|e| PipelineError::Fetch(format!("failed to run {}: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("{} exited with {}: {}", command, output.status, stderr.trim());
        return Err(PipelineError::Fetch(format!(
            "{} exited with {}: {}",
            command,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
