//! HTTP fetching and the concurrent bulk downloader.
//!
//! # Features
//!
//! - Two timeout classes: short for listing pages, long for files
//! - Streaming downloads (memory use independent of file size)
//! - One task per file with a fan-in barrier, optional concurrency cap
//! - Errors classified as fatal for the run or local to one task
//!
//! # Example
//!
//! ```no_run
//! use songgrab_core::download::{DownloadEngine, HttpClient, prepare_target_dir};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let target = Path::new("./output/ex3");
//! prepare_target_dir(target).await?;
//! let urls = vec!["https://example.com/ex3/a.mp3".to_string()];
//! let report = DownloadEngine::unbounded()
//!     .download_all(&HttpClient::new(), &urls, target)
//!     .await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod target;

pub use client::{HttpClient, HttpTimeouts};
pub use engine::{DownloadEngine, DownloadReport, EngineError, TaskFailure};
pub use error::{CopySource, DownloadError, ErrorClass};
pub use filename::filename_from_url;
pub use target::prepare_target_dir;
