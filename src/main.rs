//! PagePulse main entry point
//!
//! This is the command-line interface for the PagePulse concurrent scraper.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use pagepulse::config::load_config_with_hash;
use pagepulse::output::{CsvWriter, JsonWriter};
use pagepulse::scrape::build_pool;
use pagepulse::url::is_valid_url;
use pagepulse::{Config, WorkerPool};
use tracing_subscriber::EnvFilter;

/// PagePulse: a concurrent page scraper with a live result feed
///
/// PagePulse fetches a list of URLs through a bounded worker pool with a
/// global rate limit, extracts title, description, headings, and link counts
/// from each page, and emits results as JSON/CSV files or as a live
/// websocket feed.
#[derive(Parser, Debug)]
#[command(name = "pagepulse")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent page scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the URLs in the input file and write JSON + CSV results
    Scrape {
        /// Override the input file from the config
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Override the output base path from the config
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Run the HTTP API with the live websocket feed
    Serve {
        /// Override the listen address from the config
        #[arg(long)]
        address: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Commands::Scrape { input, output } => {
            if let Some(input) = input {
                config.files.input_path = input.display().to_string();
            }
            if let Some(output) = output {
                config.files.output_path = output.display().to_string();
            }
            handle_scrape(config).await
        }
        Commands::Serve { address } => {
            if let Some(address) = address {
                config.server.listen_addr = address.to_string();
            }
            pagepulse::server::run(config).await?;
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagepulse=info,warn"),
            1 => EnvFilter::new("pagepulse=debug,info"),
            2 => EnvFilter::new("pagepulse=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the batch scrape: read URLs, run the pool, write durable output
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting concurrent scrape...");

    let (mut pool, mut results) = build_pool(&config.scraper)?;
    pool.start();

    let input_path = config.files.input_path.clone();
    let feeder = tokio::spawn(async move { feed_jobs(pool, &input_path).await });

    // Collect terminal records; progress events are only logged here
    let mut records = Vec::new();
    while let Some(event) = results.recv().await {
        tracing::debug!(url = %event.url, status = event.status.as_str(), "result event");
        if event.is_terminal() {
            records.push(event);
        }
    }

    feeder.await??;

    tracing::info!(results = records.len(), "Scraping completed. Writing results...");

    // A sink failure is reported but does not abort the run: the other sink
    // still gets its chance to write.
    let json_writer = JsonWriter::new(config.files.output_path.as_str());
    match json_writer.write(&records) {
        Ok(()) => tracing::info!("Saved {}", json_writer.path().display()),
        Err(e) => tracing::error!(error = %e, "Failed to write JSON output"),
    }

    let csv_writer = CsvWriter::new(config.files.output_path.as_str());
    match csv_writer.write(&records) {
        Ok(()) => tracing::info!("Saved {}", csv_writer.path().display()),
        Err(e) => tracing::error!(error = %e, "Failed to write CSV output"),
    }

    Ok(())
}

/// Reads the input file line by line, submits every valid URL, and closes
/// the pool. The pool is closed even when reading fails part-way, so the
/// result stream always ends.
async fn feed_jobs(pool: WorkerPool, input_path: &str) -> pagepulse::Result<()> {
    let submitted = submit_urls(&pool, input_path).await;
    let closed = pool.close().await;
    submitted.and(closed)
}

async fn submit_urls(pool: &WorkerPool, input_path: &str) -> pagepulse::Result<()> {
    use tokio::io::AsyncBufReadExt;

    let file = tokio::fs::File::open(input_path).await?;
    let mut lines = tokio::io::BufReader::new(file).lines();

    while let Some(line) = lines.next_line().await? {
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        if !is_valid_url(url) {
            tracing::warn!(%url, "invalid URL skipped");
            continue;
        }
        pool.add_job(url).await?;
    }

    Ok(())
}
