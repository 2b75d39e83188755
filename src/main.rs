use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use link_sanitizer::{SanitizationOutcome, SanitizerBuilder};
use tracing_subscriber::EnvFilter;

/// Strip tracking parameters and rewrite links in text read from a file or stdin.
#[derive(Debug, Parser)]
#[command(name = "link-sanitizer", version)]
#[command(about = "Rewrite the URLs in a message", long_about = None)]
struct Cli {
    /// File to read; stdin when omitted.
    input: Option<PathBuf>,

    /// Directory for photo-album images.
    #[arg(long, default_value = link_sanitizer::config::DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "20", value_name = "SECS")]
    timeout: u64,

    /// Maximum album images downloaded at once.
    #[arg(long, default_value = "10", value_name = "N")]
    max_downloads: usize,

    /// Photo manifest API base URL.
    #[arg(long, default_value = link_sanitizer::album::DEFAULT_MANIFEST_ENDPOINT)]
    manifest_endpoint: String,

    /// Leave cached album images on disk instead of deleting them on exit.
    #[arg(long)]
    keep_images: bool,

    /// Debug logging for the sanitizer.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,link_sanitizer=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(cli: Cli) -> Result<SanitizationOutcome> {
    let sanitizer = SanitizerBuilder::new()
        .cache_dir(&cli.cache_dir)
        .timeout(Duration::from_secs(cli.timeout))
        .max_concurrent_downloads(cli.max_downloads)
        .manifest_endpoint(cli.manifest_endpoint)
        .build()
        .context("invalid configuration")?;

    let outcome = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("open {}", path.display()))?;
            sanitizer.sanitize_reader(file).await?
        }
        None => sanitizer.sanitize_reader(tokio::io::stdin()).await?,
    };

    for fallback in &outcome.fallbacks {
        tracing::warn!(url = %fallback.url, kind = ?fallback.kind, "{}", fallback.reason);
    }
    Ok(outcome)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let keep_images = cli.keep_images;

    let outcome = match run(cli).await {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("link-sanitizer error: {err:#}");
            std::process::exit(1);
        }
    };

    print!("{}", outcome.text);
    tracing::info!(
        changed = outcome.changed,
        urls = outcome.original_urls.len(),
        "Sanitized input"
    );

    for path in outcome.cached_image_paths() {
        eprintln!("{}", path.display());
        if !keep_images {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!("Failed to remove {}: {e}", path.display());
            }
        }
    }
}
