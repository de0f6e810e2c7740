//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use songgrab_core::Category;
use songgrab_core::download::constants::{FILE_TIMEOUT_SECS, PAGE_TIMEOUT_SECS};
use songgrab_core::{DEFAULT_BASE_URL, DEFAULT_SUFFIX};

/// Scrape a listing page for audio links and download them concurrently.
///
/// Without --category, an interactive menu asks which collection to fetch.
#[derive(Parser, Debug)]
#[command(name = "songgrab")]
#[command(author, version, about)]
pub struct Args {
    /// Directory for songs to be downloaded to
    #[arg(short = 'o', long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Category slug to download (ffxiv, ex1, ex2, ex3); skips the menu
    #[arg(long)]
    pub category: Option<Category>,

    /// Site origin serving the listing pages
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Suffix an href must end with to be downloaded
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Maximum concurrent downloads (1-100); unbounded when omitted
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Timeout for the listing page request in seconds
    #[arg(long, default_value_t = PAGE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub page_timeout: u64,

    /// Timeout for each file request in seconds
    #[arg(long, default_value_t = FILE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=86400))]
    pub file_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
