//! Application configuration module
//! This module handles the application configuration including loading,
//! validating and saving configuration settings.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::errors::AppError;

/// Environment variable consulted when no OpenAI key is configured
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Provider used for the structured-extraction calls
    #[serde(default)]
    pub provider: ProviderKind,

    /// Available providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// How sanitization and analysis calls are composed
    #[serde(default)]
    pub pipeline_mode: PipelineMode,

    /// Draw the terminal progress indicator during remote calls
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// External command collaborators
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Scratch directory for downloaded caption files (a temporary directory when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Directory receiving the JSON artifact
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Structured-extraction provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Ollama
    Ollama,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Composition of remote calls used to produce the final transcript record
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// One call cleans the document, a second call analyzes the clean text
    SanitizeThenAnalyze,
    /// A single call cleans and analyzes
    #[default]
    Fused,
    /// A raw transcript from the external command is analyzed as is
    AnalyzeRaw,
}

impl PipelineMode {
    /// Whether this mode reads caption tracks (as opposed to a raw transcript)
    pub fn uses_captions(&self) -> bool {
        !matches!(self, Self::AnalyzeRaw)
    }

    /// Number of remote calls a run performs
    pub fn remote_calls(&self) -> usize {
        match self {
            Self::SanitizeThenAnalyze => 2,
            Self::Fused | Self::AnalyzeRaw => 1,
        }
    }
}

impl std::fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SanitizeThenAnalyze => "sanitize_then_analyze",
            Self::Fused => "fused",
            Self::AnalyzeRaw => "analyze_raw",
        };
        f.write_str(name)
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Optional overall request timeout in seconds; unset means no deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    // @field: Context window requested from local models
    #[serde(default = "default_context_window")]
    pub context_window: Option<u32>,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        match provider_type {
            ProviderKind::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: None,
                context_window: default_context_window(),
                temperature: default_temperature(),
            },
            ProviderKind::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: None,
                context_window: default_context_window(),
                temperature: default_temperature(),
            },
        }
    }
}

/// External command collaborators
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetcherConfig {
    /// Caption downloader executable
    #[serde(default = "default_subtitle_command")]
    pub subtitle_command: String,

    /// Caption languages to request
    #[serde(default = "default_subtitle_languages")]
    pub subtitle_languages: Vec<String>,

    /// Raw transcript executable
    #[serde(default = "default_raw_transcript_command")]
    pub raw_transcript_command: String,

    /// Raw transcript arguments; `{video}` is replaced by the video identifier
    #[serde(default = "default_raw_transcript_args")]
    pub raw_transcript_args: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            subtitle_command: default_subtitle_command(),
            subtitle_languages: default_subtitle_languages(),
            raw_transcript_command: default_raw_transcript_command(),
            raw_transcript_args: default_raw_transcript_args(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::OpenAI),
        ProviderConfig::new(ProviderKind::Ollama),
    ]
}

fn default_context_window() -> Option<u32> {
    Some(32768)
}

fn default_temperature() -> f32 {
    0.0
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_subtitle_command() -> String {
    "yt-dlp".to_string()
}

fn default_subtitle_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_raw_transcript_command() -> String {
    "youtube_transcript_api".to_string()
}

fn default_raw_transcript_args() -> Vec<String> {
    vec!["{video}".to_string(), "--format".to_string(), "text".to_string()]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let provider_config = self.get_active_provider_config().ok_or_else(|| {
            AppError::Config(format!(
                "No configuration found for provider '{}'",
                self.provider
            ))
        })?;

        if provider_config.model.trim().is_empty() {
            return Err(AppError::Config(format!(
                "A model name is required for the {} provider",
                self.provider.display_name()
            )));
        }

        if self.provider == ProviderKind::OpenAI && self.get_api_key().is_empty() {
            return Err(AppError::Config(format!(
                "An API key is required for the OpenAI provider (set it in the config file or {})",
                OPENAI_API_KEY_ENV
            )));
        }

        if self.pipeline_mode.uses_captions() && self.fetcher.subtitle_languages.is_empty() {
            return Err(AppError::Config("At least one subtitle language is required".to_string()));
        }

        Ok(())
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access used when CLI flags override the file
    pub fn get_active_provider_config_mut(&mut self) -> Option<&mut ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            ProviderKind::OpenAI => default_openai_model(),
            ProviderKind::Ollama => default_ollama_model(),
        }
    }

    /// Get the API key for the active provider, falling back to the environment for OpenAI
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        match self.provider {
            ProviderKind::OpenAI => std::env::var(OPENAI_API_KEY_ENV).unwrap_or_default(),
            ProviderKind::Ollama => String::new(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            ProviderKind::OpenAI => default_openai_endpoint(),
            ProviderKind::Ollama => default_ollama_endpoint(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderKind::default(),
            available_providers: default_available_providers(),
            pipeline_mode: PipelineMode::default(),
            show_progress: true,
            fetcher: FetcherConfig::default(),
            cache_dir: None,
            output_dir: default_output_dir(),
            log_level: LogLevel::default(),
        }
    }
}
