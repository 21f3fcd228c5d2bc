//! Wiki-Reader main entry point
//!
//! This is the command-line interface for the Wiki-Reader paragraph harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_reader::config::{load_config_with_hash, Config};
use wiki_reader::crawler::{Coordinator, BUILTIN_CONFIG_HASH};
use wiki_reader::output::print_summary;

/// Wiki-Reader: a polite paragraph harvester
///
/// Fetches a fixed list of pages, extracts their paragraph text and saves
/// one JSON record per page to a line-delimited file. With no arguments the
/// built-in seed list is crawled into `scraped_data.jl`.
#[derive(Parser, Debug)]
#[command(name = "wiki-reader")]
#[command(version)]
#[command(about = "A polite paragraph harvester", long_about = None)]
struct Cli {
    /// Optional TOML configuration file overriding the built-in job
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => (Config::default(), BUILTIN_CONFIG_HASH.to_string()),
    };

    tracing::info!(
        "Crawling {} seeds (parallelism {} per domain, random delay up to {}ms)",
        config.seeds.len(),
        config.crawler.parallelism,
        config.crawler.random_delay_ms
    );

    let output_path = config.output.path.clone();

    let coordinator = Coordinator::new(config)
        .context("Pre-crawl validation failed")?
        .with_config_hash(config_hash);

    let summary = coordinator
        .run()
        .await
        .with_context(|| format!("Run failed for output {}", output_path))?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_reader=info,warn"),
            1 => EnvFilter::new("wiki_reader=debug,info"),
            2 => EnvFilter::new("wiki_reader=trace,debug"),
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
