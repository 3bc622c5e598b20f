/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use vidscribe::app_config::{
    Config, LogLevel, OPENAI_API_KEY_ENV, PipelineMode, ProviderConfig, ProviderKind,
};

fn openai_config_with_key(key: &str) -> Config {
    let mut config = Config::default();
    if let Some(provider) = config.get_active_provider_config_mut() {
        provider.api_key = key.to_string();
    }
    config
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.provider, ProviderKind::OpenAI);
    assert_eq!(config.pipeline_mode, PipelineMode::Fused);
    assert_eq!(config.get_model(), "gpt-4o-mini");
    assert_eq!(config.fetcher.subtitle_command, "yt-dlp");
    assert_eq!(config.fetcher.subtitle_languages, vec!["en".to_string()]);
    assert_eq!(config.output_dir, PathBuf::from("."));
    assert!(config.cache_dir.is_none());
    assert!(config.show_progress);
    assert_eq!(config.log_level, LogLevel::Info);

    let openai = config.get_active_provider_config().expect("OpenAI config should exist");
    assert_eq!(openai.temperature, 0.0);
    assert_eq!(openai.endpoint, "https://api.openai.com/v1");
}

#[test]
fn test_config_validation_withOpenAiKey_shouldPass() {
    let config = openai_config_with_key("sk-test");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withoutOpenAiKey_shouldFailUnlessEnvIsSet() {
    let config = openai_config_with_key("");
    if std::env::var(OPENAI_API_KEY_ENV).is_err() {
        assert!(config.validate().is_err());
    }
}

#[test]
fn test_config_validation_withEmptyModel_shouldFail() {
    let mut config = Config {
        provider: ProviderKind::Ollama,
        ..Config::default()
    };
    assert!(config.validate().is_ok());

    if let Some(provider) = config.get_active_provider_config_mut() {
        provider.model = "  ".to_string();
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withMissingProviderEntry_shouldFail() {
    let config = Config {
        provider: ProviderKind::Ollama,
        available_providers: vec![ProviderConfig::new(ProviderKind::OpenAI)],
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withNoLanguages_shouldFailOnlyForCaptionModes() {
    let mut config = openai_config_with_key("sk-test");
    config.fetcher.subtitle_languages.clear();
    assert!(config.validate().is_err());

    config.pipeline_mode = PipelineMode::AnalyzeRaw;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "provider": "ollama",
        "pipeline_mode": "sanitize_then_analyze",
        "output_dir": "out",
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.provider, ProviderKind::Ollama);
    assert_eq!(config.pipeline_mode, PipelineMode::SanitizeThenAnalyze);
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.get_model(), "llama3.1:8b");
    assert_eq!(config.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.fetcher.raw_transcript_command, "youtube_transcript_api");
}

#[test]
fn test_provider_kind_fromStr_shouldBeCaseInsensitive() {
    assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
    assert!("anthropic".parse::<ProviderKind>().is_err());
}

#[test]
fn test_pipeline_mode_shouldReportCallCount() {
    assert_eq!(PipelineMode::SanitizeThenAnalyze.remote_calls(), 2);
    assert_eq!(PipelineMode::Fused.remote_calls(), 1);
    assert_eq!(PipelineMode::AnalyzeRaw.remote_calls(), 1);
    assert!(!PipelineMode::AnalyzeRaw.uses_captions());
    assert_eq!(PipelineMode::SanitizeThenAnalyze.to_string(), "sanitize_then_analyze");
}

#[test]
fn test_log_level_shouldMapToFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
