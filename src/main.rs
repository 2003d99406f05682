//! seo-sweep main entry point
//!
//! This is the command-line interface for the seo-sweep sitemap sweeper.

use anyhow::{bail, Context};
use clap::Parser;
use seo_sweep::config::{load_config_with_hash, validate_config, Config};
use seo_sweep::crawler::Coordinator;
use seo_sweep::output::{print_statistics, summarize, write_results};
use seo_sweep::preflight::{check_connectivity, check_seed_reachable};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// seo-sweep: a sitemap-driven page status sweeper
///
/// seo-sweep follows a site's sitemap index down to every listed page,
/// fetches each page under a global rate limit and writes one line per
/// page with its HTTP status.
#[derive(Parser, Debug)]
#[command(name = "seo-sweep")]
#[command(version)]
#[command(about = "A sitemap-driven page status sweeper", long_about = None)]
struct Cli {
    /// Seed sitemap (or sitemap index) URL
    #[arg(long, value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Results file (overrides [output] path)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum sitemap nesting depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum concurrent page fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Wall-clock budget for the sitemap walk, in seconds
    #[arg(long)]
    walk_budget_secs: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Minimum spacing between requests, in milliseconds
    #[arg(long)]
    rate_limit_ms: Option<u64>,

    /// Also extract title, H1 and meta description
    #[arg(long)]
    seo: bool,

    /// Skip the outbound connectivity check
    #[arg(long)]
    skip_connectivity_check: bool,

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

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Starting the sweep...");
    let config = build_config(&cli)?;

    if cli.skip_connectivity_check {
        tracing::info!("Skipping internet connection check");
    } else {
        tracing::info!("Checking internet connection...");
        check_connectivity(
            &config.http.connectivity_probe,
            config.http.connectivity_timeout(),
        )
        .await
        .context("connection check failed")?;
    }

    let seed = cli.url.trim().to_string();
    tracing::info!("URL to sweep: {}", seed);

    let coordinator = Coordinator::new(config).context("failed to build HTTP client")?;

    tracing::info!("Validating URL...");
    let fetcher = coordinator.fetcher();
    check_seed_reachable(fetcher.as_ref(), &seed)
        .await
        .context("URL validation failed")?;

    let results = coordinator.run(&seed).await;
    tracing::info!("Scraped {} results", results.len());

    let output_path = Path::new(&coordinator.config().output.path);
    tracing::info!("Writing results to {}...", output_path.display());
    let written = write_results(output_path, &results, coordinator.config().output.seo)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    tracing::info!("Finished writing {} results to file", written);

    if !cli.quiet {
        print_statistics(&summarize(&results));
    }

    tracing::info!("Sweep finished successfully");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_sweep=info,warn"),
            1 => EnvFilter::new("seo_sweep=debug,info"),
            2 => EnvFilter::new("seo_sweep=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(budget) = cli.walk_budget_secs {
        config.crawler.walk_budget_secs = budget;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.http.timeout_secs = timeout;
    }
    if let Some(interval) = cli.rate_limit_ms {
        config.http.rate_limit_interval_ms = interval;
    }
    if let Some(output) = &cli.output {
        let Some(path) = output.to_str() else {
            bail!("output path {} is not valid UTF-8", output.display());
        };
        config.output.path = path.to_string();
    }
    if cli.seo {
        config.output.seo = true;
    }

    validate_config(&config).context("invalid configuration")?;
    Ok(config)
}
