// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use vidscribe::app_config::{self, Config, PipelineMode, ProviderKind};
use vidscribe::app_controller::Controller;

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    #[value(name = "openai")]
    OpenAI,
    Ollama,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::OpenAI => ProviderKind::OpenAI,
            CliProvider::Ollama => ProviderKind::Ollama,
        }
    }
}

/// CLI Wrapper for PipelineMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPipelineMode {
    /// Clean the transcript, then analyze the clean text (two calls)
    SanitizeThenAnalyze,
    /// Clean and analyze in one call
    Fused,
    /// Analyze a raw transcript from the transcript command
    AnalyzeRaw,
}

impl From<CliPipelineMode> for PipelineMode {
    fn from(cli_mode: CliPipelineMode) -> Self {
        match cli_mode {
            CliPipelineMode::SanitizeThenAnalyze => PipelineMode::SanitizeThenAnalyze,
            CliPipelineMode::Fused => PipelineMode::Fused,
            CliPipelineMode::AnalyzeRaw => PipelineMode::AnalyzeRaw,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for vidscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vidscribe - video captions to a cleaned, analyzed transcript
///
/// Downloads the captions of a video, assembles them into a transcript
/// and asks a language model to clean and analyze it.
#[derive(Parser, Debug)]
#[command(name = "vidscribe")]
#[command(version)]
#[command(about = "Turn video captions into a cleaned and analyzed transcript")]
#[command(long_about = "vidscribe downloads the captions of a video, assembles them into a transcript and asks an LLM to clean and analyze it. The result is written as a JSON document.

EXAMPLES:
    vidscribe https://youtu.be/dQw4w9WgXcQ                  # Analyze using default config
    vidscribe https://youtu.be/dQw4w9WgXcQ out.json         # Choose the output file
    vidscribe --mode sanitize-then-analyze <URL>            # Clean and analyze in two calls
    vidscribe -p ollama -m llama3.1:8b <URL>                # Use a local model
    vidscribe completions bash > vidscribe.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one is created. The OpenAI key may also be given through
    the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Video URL to process
    #[arg(value_name = "VIDEO_URL")]
    video_url: Option<String>,

    /// Output file (defaults to <output_dir>/<video id>.json)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use
    #[arg(short, long)]
    model: Option<String>,

    /// How the cleaning and analysis calls are composed
    #[arg(long, value_enum)]
    mode: Option<CliPipelineMode>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vidscribe", &mut std::io::stdout());
        return Ok(());
    }

    let video_url = cli.video_url.clone().ok_or_else(|| {
        anyhow!("VIDEO_URL is required when no subcommand is specified")
    })?;

    if let Err(e) = run(cli, &video_url).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(options: CommandLineOptions, video_url: &str) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    info!(
        "Using {} ({}) in {} mode",
        config.provider.display_name(),
        config.get_model(),
        config.pipeline_mode
    );

    let controller = Controller::with_config(config)?;
    controller.run(video_url, options.output_file.clone()).await?;

    Ok(())
}

// @loads: Config file (created with defaults when missing), then CLI overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(provider) = &options.provider {
        config.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        if let Some(provider_config) = config.get_active_provider_config_mut() {
            provider_config.model = model.clone();
        }
    }

    if let Some(mode) = &options.mode {
        config.pipeline_mode = mode.clone().into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
