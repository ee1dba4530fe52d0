// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod archive_utils;
mod catalog;
mod dictionary_model;
mod errors;
mod file_utils;
mod language_utils;
mod tei_converter;

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

impl From<app_config::LogLevel> for LevelFilter {
    fn from(level: app_config::LogLevel) -> Self {
        match level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert FreeDict dictionaries from TEI sources (default command)
    #[command(alias = "convert")]
    Convert(ConvertArgs),

    /// Generate shell completions for teidict
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Language pair to convert (e.g. 'eng-deu'), or 'all' for every dictionary
    #[arg(value_name = "DICTIONARY")]
    dictionary: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Directory to write converted dictionaries to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory to cache downloaded archives in
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// FreeDict catalog URL
    #[arg(long)]
    catalog_url: Option<String>,

    /// Maximum number of concurrent conversions
    #[arg(short = 'j', long)]
    concurrent: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// teidict - FreeDict TEI to dictionary XML converter
///
/// Downloads FreeDict source tarballs and converts their TEI dictionaries
/// into normalized dictionary XML for downstream lookup tooling.
#[derive(Parser, Debug)]
#[command(name = "teidict")]
#[command(version = "1.0.0")]
#[command(about = "FreeDict TEI to dictionary XML converter")]
#[command(long_about = "teidict fetches the FreeDict catalog, downloads dictionary source tarballs
and converts their TEI XML into normalized dictionary XML.

EXAMPLES:
    teidict eng-deu                     # Convert one language pair
    teidict all                         # Convert every catalog dictionary
    teidict -f eng-deu                  # Force overwrite existing output
    teidict -o out/ -j 8 all            # Custom output dir, 8 concurrent pairs
    teidict --log-level debug eng-fra   # Convert with debug logging
    teidict completions bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Language pair to convert (e.g. 'eng-deu'), or 'all' for every dictionary
    #[arg(value_name = "DICTIONARY")]
    dictionary: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Directory to write converted dictionaries to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory to cache downloaded archives in
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// FreeDict catalog URL
    #[arg(long)]
    catalog_url: Option<String>,

    /// Maximum number of concurrent conversions
    #[arg(short = 'j', long)]
    concurrent: Option<usize>,

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

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "teidict", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let convert_args = ConvertArgs {
                dictionary: cli.dictionary,
                force_overwrite: cli.force_overwrite,
                output_dir: cli.output_dir,
                cache_dir: cli.cache_dir,
                catalog_url: cli.catalog_url,
                concurrent: cli.concurrent,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args).await
        }
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.into());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(dictionary) = &options.dictionary {
        config.dictionary = dictionary.clone();
    }

    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(cache_dir) = &options.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }

    if let Some(catalog_url) = &options.catalog_url {
        config.catalog_url = catalog_url.clone();
    }

    if let Some(concurrent) = options.concurrent {
        config.concurrent_conversions = concurrent;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.clone().into());
    }

    // Create controller and run the conversion
    let controller = Controller::with_config(config)?;
    let summary = controller.run(options.force_overwrite).await?;

    if summary.failed > 0 {
        anyhow::bail!("{} language pair(s) failed to convert", summary.failed);
    }

    Ok(())
}
