//! Listing page scraping.
//!
//! Fetches a listing page, streams its body through a tag scanner and collects
//! the anchors whose `href` ends with a configured suffix, resolved against the
//! site's base origin.
//!
//! # Example
//!
//! ```no_run
//! use songgrab_core::download::HttpClient;
//! use songgrab_core::scrape::LinkExtractor;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = LinkExtractor::new(HttpClient::new(), "https://ffxiv.tylian.net", "mp3");
//! let links = extractor.extract_links(&extractor.page_url("ex3")).await?;
//! println!("Found {} songs", links.len());
//! # Ok(())
//! # }
//! ```

mod extractor;

pub use extractor::{AnchorScanner, LinkExtractor, extract_matching_links, resolve_href};
