// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lingualink::app_config::{self, Config, TranslationProvider};
use lingualink::probe::{self, SAMPLE_CAPTIONS};
use lingualink::server::{self, AppState};
use lingualink::translation::{ProviderProfile, TranslationPool, TranslationService};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
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
    /// Run the caption translation server (default command)
    Serve(ServeArgs),

    /// Send captions to a running server and print the replies
    Probe(ProbeArgs),

    /// Generate shell completions for lingualink
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Default)]
struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Translation provider to use
    #[arg(long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// WebSocket URL of the server
    #[arg(long, default_value = "ws://localhost:8000/ws")]
    url: String,

    /// Target language identifiers to request (all supported when omitted)
    #[arg(short, long)]
    target: Vec<String>,

    /// Seconds to wait for each reply
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Caption lines to send; two sample sentences when omitted
    #[arg(value_name = "TEXT")]
    lines: Vec<String>,
}

/// LinguaLink - live caption translation
///
/// Accepts incremental speech captions over WebSocket, groups them into
/// sentences and returns their translations.
#[derive(Parser, Debug)]
#[command(name = "lingualink")]
#[command(version)]
#[command(about = "Live caption chunking and translation server")]
#[command(long_about = "LinguaLink accepts live caption updates over WebSocket, reconciles them into sentence chunks and sends back translations.

EXAMPLES:
    lingualink                                  # Serve using conf.json
    lingualink serve -p 9000 --provider mock    # Serve with the mock translator
    lingualink probe \"Good morning everyone.\"   # Send a caption to a running server
    lingualink completions bash > lingualink.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,
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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lingualink", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Probe(args)) => run_probe(args).await,
        Some(Commands::Serve(args)) => run_serve(args).await,
        None => run_serve(ServeArgs {
            config_path: "conf.json".to_string(),
            ..ServeArgs::default()
        })
        .await,
    }
}

async fn run_serve(options: ServeArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = PathBuf::from(&options.config_path);
    let (mut config, created) = Config::load_or_create(&config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", config_path.display());
    }

    // Override config with CLI options if provided
    if let Some(host) = &options.host {
        config.server.host = host.clone();
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        let provider = config.translation.provider;
        if let Some(provider_config) = config.translation.get_provider_config_mut(&provider) {
            provider_config.model = model.clone();
        }
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let source_language = config.source_language_id()?;
    let targets = Arc::new(config.supported_targets()?);
    let service = TranslationService::new(config.translation.clone(), source_language);

    info!(
        "Translating {} into {} target(s) with {} ({})",
        config.source_language,
        targets.len(),
        config.translation.provider.display_name(),
        config.translation.get_model()
    );
    if let Err(e) = service.test_connection().await {
        warn!("Translation backend not reachable yet: {}", e);
    }
    if ProviderProfile::for_provider(config.translation.provider).cold_start {
        info!("The first translation may be slow while the model loads");
    }

    let pool = TranslationPool::from_config(Arc::new(service), &config.translation);
    let state = AppState {
        targets,
        pool,
        max_message_bytes: config.server.max_message_bytes,
        max_pending_chunks: config.server.max_pending_chunks,
    };

    server::serve(&config.server, state).await?;
    Ok(())
}

async fn run_probe(args: ProbeArgs) -> Result<()> {
    let lines: Vec<String> = if args.lines.is_empty() {
        SAMPLE_CAPTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        args.lines
    };
    let targets = (!args.target.is_empty()).then_some(args.target.as_slice());

    let replies = probe::run_probe(
        &args.url,
        &lines,
        targets,
        Duration::from_secs(args.timeout_secs),
    )
    .await?;

    for reply in replies {
        println!("{}", reply);
    }
    Ok(())
}
