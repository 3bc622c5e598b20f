/*!
 * Common test utilities for the vidscribe test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use vidscribe::app_config::{Config, PipelineMode};

/// Auto-caption style document: three rolling blocks with a repeated line
pub const ROLLING_CAPTIONS_VTT: &str = "WEBVTT
Kind: captions
Language: en

00:00:00.000 --> 00:00:02.000 align:start position:0%
welcome back to the channel

00:00:02.000 --> 00:00:04.000 align:start position:0%
welcome back to the channel

00:00:04.000 --> 00:00:06.000 align:start position:0%
today we talk about rust
";

/// Three distinct cues after the header
pub const LECTURE_CAPTIONS_VTT: &str = "WEBVTT

00:00:00.000 --> 00:00:03.000
ownership is the core idea

00:00:03.000 --> 00:00:06.000
every value has a single owner

00:00:06.000 --> 00:00:09.000
borrowing lends access without moving
";

/// Document with a single cue that contains only timing information
pub const TIMING_ONLY_VTT: &str = "WEBVTT

00:00:00.000 --> 00:00:02.000 align:start position:0%
";

/// Route log output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration writing into `output_dir` without terminal drawing
pub fn test_config(output_dir: &Path, mode: PipelineMode) -> Config {
    Config {
        pipeline_mode: mode,
        show_progress: false,
        output_dir: output_dir.to_path_buf(),
        ..Config::default()
    }
}
