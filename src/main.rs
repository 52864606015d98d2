// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::{Config, LogLevel, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod document;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Deepl,
    Libretranslate,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Deepl => TranslationProvider::Deepl,
            CliTranslationProvider::Libretranslate => TranslationProvider::Libretranslate,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for md-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// md-translate - markdown translation tool
///
/// Translates markdown files while preserving markdown syntax: headings,
/// emphasis, links, images, lists, quotes and code all keep their original
/// formatting, and only human-readable text is sent to the translation
/// service.
#[derive(Parser, Debug)]
#[command(name = "md-translate")]
#[command(version = "1.0.0")]
#[command(about = "Translate markdown files while preserving formatting")]
#[command(long_about = "md-translate parses markdown files into a block tree, translates only the
human-readable text and writes the result back, markdown syntax untouched.
Progress is checkpointed after every translated fragment, so an interrupted
run resumes where it stopped.

EXAMPLES:
    md-translate README.md -F en -T fr -k <key>   # Translate a single file
    md-translate docs/ -P libretranslate          # Translate a whole tree
    md-translate -N docs/                         # Write *_translated.md files
    md-translate -D -O README.md                  # Replace text, even if marked
    md-translate -X 4 docs/                       # Four files in parallel
    md-translate completions bash                 # Generate shell completions

CONFIGURATION:
    Options can also be stored in a JSON config file (conf.json by default,
    override with --config-path). Command line options win over the file.
    Use --dump-config to write the effective configuration and exit.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Markdown files or directories to translate
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Source language code (ISO 639-1)
    #[arg(short = 'F', long)]
    from_lang: Option<String>,

    /// Target language code (ISO 639-1)
    #[arg(short = 'T', long)]
    to_lang: Option<String>,

    /// Translation service to use
    #[arg(short = 'P', long, value_enum)]
    service: Option<CliTranslationProvider>,

    /// Override the translation service host
    #[arg(long)]
    service_host: Option<String>,

    /// API key for the translation service
    #[arg(short = 'k', long, env = "MD_TRANSLATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of files translated in parallel
    #[arg(short = 'X', long)]
    processes: Option<usize>,

    /// Write translations to a new "_translated" file
    #[arg(short = 'N', long)]
    new_file: bool,

    /// Ignore an existing checkpoint and re-parse the source
    #[arg(short = 'I', long)]
    ignore_cache: bool,

    /// Keep the checkpoint file after a successful write
    #[arg(short = 'S', long)]
    save_temp_on_complete: bool,

    /// Translate files that already carry the translated marker
    #[arg(short = 'O', long)]
    overwrite: bool,

    /// Replace original text instead of interleaving translations
    #[arg(short = 'D', long)]
    drop_original: bool,

    /// Configuration file path
    #[arg(short = 'c', long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short = 'l', long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    dump_config: bool,
}

/// Custom logger writing timestamped colored lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_code(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_code(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // updated after the configuration is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "md-translate", &mut std::io::stdout());
        return Ok(());
    }

    run_translate(cli).await
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load configuration from file when present, defaults otherwise
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        debug!(
            "Config file not found at '{}', using default configuration",
            config_path
        );
        Config::default()
    };

    // Override config with CLI options if provided
    if let Some(from_lang) = options.from_lang {
        config.from_lang = from_lang;
    }
    if let Some(to_lang) = options.to_lang {
        config.to_lang = to_lang;
    }
    if let Some(service) = options.service {
        config.provider = service.into();
    }
    if let Some(service_host) = options.service_host {
        config.service_host = Some(service_host);
    }
    if let Some(api_key) = options.api_key {
        config.api_key = api_key;
    }
    if let Some(processes) = options.processes {
        config.processes = processes;
    }
    if options.new_file {
        config.new_file = true;
    }
    if options.ignore_cache {
        config.ignore_cache = true;
    }
    if options.save_temp_on_complete {
        config.save_temp_on_complete = true;
    }
    if options.overwrite {
        config.overwrite = true;
    }
    if options.drop_original {
        config.drop_original = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    if options.dump_config {
        config.save(config_path)?;
        println!("Configuration written to {}", config_path);
        return Ok(());
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, apply it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    if options.paths.is_empty() {
        return Err(anyhow!("PATH is required when no subcommand is specified"));
    }

    let controller = Controller::with_config(config)?;
    controller.run(&options.paths).await?;
    Ok(())
}
