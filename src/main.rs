//! CLI entry point for urlgrab.

use std::io::{self, IsTerminal, Read, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, error, info};
use urlgrab_core::Fetcher;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries fetched bodies only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let urls = if !args.urls.is_empty() {
        args.urls.clone()
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        info!("No input provided. Pass URLs as arguments or pipe them via stdin.");
        info!("Example: urlgrab https://example.com/");
        return Ok(());
    };

    if urls.is_empty() {
        info!("No URLs found in input");
        return Ok(());
    }

    let mut fetcher =
        Fetcher::new(args.fetcher_config()).context("failed to open cache directory")?;

    let mut stdout = io::stdout().lock();
    let mut failed = 0usize;
    for url in &urls {
        match fetcher.fetch(url).await {
            Ok(body) => {
                stdout
                    .write_all(&body)
                    .context("failed to write body to stdout")?;
            }
            Err(e) => {
                error!(url = %url, error = %e, "fetch failed");
                failed += 1;
            }
        }
    }
    stdout.flush().context("failed to flush stdout")?;

    info!(total = urls.len(), failed, "done");
    if failed > 0 {
        bail!("{failed} of {} URLs failed", urls.len());
    }
    Ok(())
}
