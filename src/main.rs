//! Sozluk-Ripple main entry point
//!
//! This is the command-line interface for the Sozluk-Ripple topic scraper.

use anyhow::Context;
use clap::Parser;
use sozluk_ripple::config::{load_config_with_hash, validate, Config};
use sozluk_ripple::crawler::scrape;
use sozluk_ripple::output::{print_summary, CsvOutput, ResultSink};
use sozluk_ripple::RippleError;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Sozluk-Ripple: a patient topic scraper
///
/// Sozluk-Ripple collects every entry of a single Ekşi Sözlük topic,
/// backing off when the site pushes back, and saves them as CSV.
#[derive(Parser, Debug)]
#[command(name = "sozluk-ripple")]
#[command(version = "1.0.0")]
#[command(about = "Scrape every entry of a topic into CSV", long_about = None)]
struct Cli {
    /// Topic URL, e.g. https://eksisozluk.com/baslik--123
    #[arg(value_name = "URL")]
    url: String,

    /// Delay between page requests in milliseconds
    #[arg(short, long, value_name = "MS")]
    delay: Option<u64>,

    /// Output CSV path (generated under the output directory when omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    silent: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load and validate configuration
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    // Setup logging based on verbosity
    let silent = cli.silent || !config.logging.verbose;
    setup_logging(cli.verbose, silent, config.logging.file.as_deref())?;

    match (&cli.config, config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::debug!("No configuration file given, using defaults"),
    }

    handle_scrape(&cli, &config).await
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(delay) = cli.delay {
        config.scraper.delay_ms = delay;
    }
    if cli.silent {
        config.logging.verbose = false;
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output follows the verbosity flags. When a log file is configured
/// it receives everything at debug level regardless of the console filter.
fn setup_logging(verbose: u8, silent: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = if silent {
        // Only show warnings and errors
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("sozluk_ripple=info,warn"),
            1 => EnvFilter::new("sozluk_ripple=debug,info"),
            _ => EnvFilter::new("sozluk_ripple=trace,debug"),
        }
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(filter);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new("sozluk_ripple=debug,info")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the scrape: runs the crawler, saves the CSV and prints the summary
async fn handle_scrape(cli: &Cli, config: &Config) -> anyhow::Result<ExitCode> {
    tracing::info!(
        "Delay between pages: {}ms, allowed hosts: {}",
        config.scraper.delay_ms,
        config.scraper.allowed_hosts.join(", ")
    );

    let results = match scrape(config, &cli.url).await {
        Ok(results) => results,
        Err(RippleError::Fatal(e)) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Failed to start scrape"),
    };

    let warnings = results.warnings().len();

    if results.is_empty() {
        tracing::warn!("No entries found, nothing to save");
        println!("No entries found. Warnings: {}", warnings);
        return Ok(ExitCode::SUCCESS);
    }

    let mut sink = CsvOutput::new(&config.output.directory);
    if let Some(path) = &cli.output {
        sink = sink.with_path(path);
    }
    let written = sink.persist(&results).context("Failed to save results")?;

    print_summary(&results.summarize());
    println!("Data saved to: {}", written.data.display());
    if let Some(errors) = &written.errors {
        println!("Skipped pages saved to: {}", errors.display());
    }
    println!("Warnings: {}", warnings);

    Ok(ExitCode::SUCCESS)
}
