//! CLI entry point for songgrab.

use std::io;

use anyhow::{Result, bail};
use clap::Parser;
use songgrab_core::{
    DownloadEngine, HttpClient, HttpTimeouts, LinkExtractor, MenuChoice, prepare_target_dir,
    prompt_category,
};
use tracing::{debug, error, info};

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

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    if !args.quiet {
        println!(
            "This unofficial tool downloads songs from {}\n",
            args.base_url
        );
    }

    let category = match args.category {
        Some(category) => category,
        None => {
            let choice = tokio::task::spawn_blocking(|| {
                prompt_category(&mut io::stdin().lock(), &mut io::stdout().lock())
            })
            .await??;
            match choice {
                MenuChoice::Category(category) => category,
                MenuChoice::Quit => {
                    debug!("quit selected");
                    return Ok(());
                }
            }
        }
    };
    info!(category = %category, slug = category.slug(), "category selected");

    let target_dir = args.output_dir.join(category.slug());
    prepare_target_dir(&target_dir).await?;

    let client = HttpClient::with_timeouts(HttpTimeouts::from_secs(
        args.page_timeout,
        args.file_timeout,
    ))?;
    let engine = DownloadEngine::from_cap(args.concurrency.map(usize::from))?;

    // Extraction finishes before any download starts.
    let extractor = LinkExtractor::new(client.clone(), &args.base_url, &args.suffix);
    let links = extractor
        .extract_links(&extractor.page_url(category.slug()))
        .await?;

    if links.is_empty() {
        info!("No matching links found");
        return Ok(());
    }

    let report = engine.download_all(&client, &links, &target_dir).await?;

    if !report.is_success() {
        for failure in report.failures() {
            error!(url = %failure.url, error = %failure.error, "download failed");
        }
        let failed: Vec<&str> = report.failed_urls().collect();
        bail!(
            "{} of {} downloads failed: {}",
            failed.len() + report.panicked(),
            report.total(),
            failed.join(", ")
        );
    }

    info!(saved = report.saved().len(), "Completed!");
    Ok(())
}
