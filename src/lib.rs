//! Songgrab Core Library
//!
//! Scrapes a listing page for links to audio files and downloads every match
//! concurrently into a local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Content categories and the interactive selection menu
//! - [`scrape`] - Listing page fetch and anchor extraction
//! - [`download`] - HTTP client, error taxonomy and the bulk downloader
//!
//! Extraction runs to completion before any download starts.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod download;
pub mod scrape;

/// Default site origin the listing pages are served from.
pub const DEFAULT_BASE_URL: &str = "https://ffxiv.tylian.net";

/// Default suffix identifying downloadable links.
pub const DEFAULT_SUFFIX: &str = "mp3";

// Re-export commonly used types
pub use catalog::{Category, MenuChoice, prompt_category};
pub use download::{
    DownloadEngine, DownloadError, DownloadReport, EngineError, ErrorClass, HttpClient,
    HttpTimeouts, prepare_target_dir,
};
pub use scrape::LinkExtractor;
