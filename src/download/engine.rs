//! Bulk downloader: one concurrent task per URL, with a fan-in barrier.
//!
//! # Overview
//!
//! [`DownloadEngine::download_all`] spawns one Tokio task per candidate URL
//! and waits until every task has reached a terminal state. Errors are
//! triaged by class:
//!
//! - fetch and filesystem failures end the run immediately
//!   ([`EngineError::Fatal`]); the remaining tasks are aborted
//! - copy failures are recorded in the [`DownloadReport`] while sibling tasks
//!   keep running
//!
//! # Example
//!
//! ```no_run
//! use songgrab_core::download::{DownloadEngine, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let urls = vec!["https://example.com/ex3/a.mp3".to_string()];
//! let report = DownloadEngine::unbounded()
//!     .download_all(&client, &urls, Path::new("./output/ex3"))
//!     .await?;
//! println!("Saved: {}, Failed: {}", report.saved().len(), report.failures().len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::filename::filename_from_url;
use super::{DownloadError, HttpClient};

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// A task hit an error that ends the whole run.
    #[error("download of {url} failed: {source}")]
    Fatal {
        /// The URL whose task failed.
        url: String,
        /// The fatal error.
        #[source]
        source: DownloadError,
    },
}

/// A download task that failed without ending the run.
#[derive(Debug)]
pub struct TaskFailure {
    /// The URL that failed.
    pub url: String,
    /// Why it failed.
    pub error: DownloadError,
}

/// Outcome of a [`DownloadEngine::download_all`] run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    saved: Vec<PathBuf>,
    failures: Vec<TaskFailure>,
    panicked: usize,
}

impl DownloadReport {
    /// Paths of files written completely, in completion order.
    #[must_use]
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Tasks whose copy step failed.
    #[must_use]
    pub fn failures(&self) -> &[TaskFailure] {
        &self.failures
    }

    /// Number of tasks that panicked.
    #[must_use]
    pub fn panicked(&self) -> usize {
        self.panicked
    }

    /// Returns the number of tasks that reached a terminal state.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved.len() + self.failures.len() + self.panicked
    }

    /// Returns true when every task saved its file.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.panicked == 0
    }

    /// URLs of the failed tasks.
    pub fn failed_urls(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|failure| failure.url.as_str())
    }
}

/// Concurrent bulk downloader.
///
/// # Concurrency Model
///
/// - Every URL gets its own Tokio task, spawned up front
/// - With a cap, each task acquires a semaphore permit before touching the
///   network; without one, all tasks run at once
/// - The caller blocks until all tasks finish (or a fatal error aborts them)
#[derive(Debug, Clone, Default)]
pub struct DownloadEngine {
    /// Semaphore for the optional concurrency cap.
    semaphore: Option<Arc<Semaphore>>,
    /// Configured cap, `None` when unbounded.
    cap: Option<usize>,
}

impl DownloadEngine {
    /// Creates an engine that runs every download at once.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            semaphore: None,
            cap: None,
        }
    }

    /// Creates an engine running at most `concurrency` downloads at a time.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use songgrab_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::with_concurrency(4).unwrap();
    /// assert_eq!(engine.concurrency(), Some(4));
    /// ```
    #[instrument(level = "debug")]
    pub fn with_concurrency(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self {
            semaphore: Some(Arc::new(Semaphore::new(concurrency))),
            cap: Some(concurrency),
        })
    }

    /// Builds an engine from an optional cap; `None` means unbounded.
    ///
    /// # Errors
    ///
    /// Same as [`with_concurrency`](Self::with_concurrency).
    pub fn from_cap(cap: Option<usize>) -> Result<Self, EngineError> {
        cap.map_or_else(|| Ok(Self::unbounded()), Self::with_concurrency)
    }

    /// Returns the configured cap, or `None` when unbounded.
    #[must_use]
    pub fn concurrency(&self) -> Option<usize> {
        self.cap
    }

    /// Downloads every URL into `target_dir` and waits for all of them.
    ///
    /// Each URL is attempted exactly once, named after its final path
    /// segment. URLs sharing a name are logged: their tasks write the same
    /// file concurrently and its final content is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Fatal`] as soon as any task reports a fetch or
    /// filesystem error; the remaining tasks are aborted.
    ///
    /// Copy failures do NOT cause this method to error; they are listed in
    /// the returned report.
    #[instrument(skip(self, client, urls), fields(target_dir = %target_dir.display(), count = urls.len()))]
    pub async fn download_all(
        &self,
        client: &HttpClient,
        urls: &[String],
        target_dir: &Path,
    ) -> Result<DownloadReport, EngineError> {
        warn_on_name_collisions(urls);

        let mut tasks = JoinSet::new();
        for url in urls {
            let client = client.clone();
            let url = url.clone();
            let target_dir = target_dir.to_path_buf();
            let semaphore = self.semaphore.clone();

            tasks.spawn(async move {
                // Held until the task ends.
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let result = download_one(&client, &url, &target_dir).await;
                (url, result)
            });
        }

        debug!(task_count = tasks.len(), "waiting for downloads to complete");

        let mut report = DownloadReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(path))) => report.saved.push(path),
                Ok((url, Err(e))) if e.is_fatal() => {
                    error!(url = %url, error = %e, "fatal download error, aborting run");
                    tasks.abort_all();
                    return Err(EngineError::Fatal { url, source: e });
                }
                Ok((url, Err(e))) => {
                    warn!(url = %url, error = %e, "download failed");
                    report.failures.push(TaskFailure { url, error: e });
                }
                Err(e) => {
                    warn!(error = %e, "download task panicked");
                    report.panicked += 1;
                }
            }
        }

        info!(
            saved = report.saved.len(),
            failed = report.failures.len(),
            panicked = report.panicked,
            "all downloads finished"
        );
        Ok(report)
    }
}

async fn download_one(
    client: &HttpClient,
    url: &str,
    target_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let file_name = filename_from_url(url);
    if file_name.is_empty() {
        return Err(DownloadError::no_file_name(url));
    }
    let file_path = target_dir.join(file_name);

    info!(url = %url, "downloading");
    let bytes = client.download_to_file(url, &file_path).await?;
    info!(path = %file_path.display(), bytes, "file saved");
    Ok(file_path)
}

fn warn_on_name_collisions(urls: &[String]) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for url in urls {
        let name = filename_from_url(url);
        if let Some(previous) = seen.insert(name, url) {
            warn!(
                file_name = name,
                first = previous,
                second = %url,
                "URLs share a destination file name; concurrent writes to the same file, result is unspecified"
            );
        }
    }
}
