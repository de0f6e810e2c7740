//! HTTP client wrapper for page fetches and streaming file downloads.
//!
//! Two request classes are served by two underlying clients: a short timeout
//! for listing pages and a long one for audio files. Timeouts are fixed when
//! the client is built.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{FILE_TIMEOUT_SECS, PAGE_TIMEOUT_SECS};
use super::error::DownloadError;

/// Wall-clock timeouts for the two request classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Timeout for listing page fetches.
    pub page: Duration,
    /// Timeout for file fetches, including the body transfer.
    pub file: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(PAGE_TIMEOUT_SECS),
            file: Duration::from_secs(FILE_TIMEOUT_SECS),
        }
    }
}

impl HttpTimeouts {
    /// Builds timeouts from whole seconds.
    #[must_use]
    pub fn from_secs(page_secs: u64, file_secs: u64) -> Self {
        Self {
            page: Duration::from_secs(page_secs),
            file: Duration::from_secs(file_secs),
        }
    }
}

/// HTTP client for listing pages and file downloads.
///
/// Create once and clone freely; clones share connection pools.
///
/// # Example
///
/// ```no_run
/// use songgrab_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let bytes = client
///     .download_to_file("https://example.com/ex3/a.mp3", Path::new("./output/a.mp3"))
///     .await?;
/// println!("Downloaded {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    page: Client,
    file: Client,
    timeouts: HttpTimeouts,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts (20s page, 3min file).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(HttpTimeouts::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if either underlying client
    /// cannot be built.
    #[instrument(level = "debug")]
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, DownloadError> {
        let page = build_client(timeouts.page)?;
        let file = build_client(timeouts.file)?;
        Ok(Self {
            page,
            file,
            timeouts,
        })
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub fn timeouts(&self) -> HttpTimeouts {
        self.timeouts
    }

    /// Requests a listing page and returns the response with its body unread.
    ///
    /// The body is left for the caller to read chunk by chunk; the page
    /// timeout keeps running until it has been consumed.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails or
    /// times out, or the server answers with a non-2xx status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = send_get(&self.page, url).await?;
        debug!(content_length = ?response.content_length(), "page response received");
        Ok(response)
    }

    /// Downloads `url` into `file_path`, creating or truncating the file.
    ///
    /// The response is requested first; the file is only created once a
    /// successful response is available. The body is streamed chunk by chunk,
    /// so memory use does not depend on file size.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// - Fetch errors (`Network`, `Timeout`, `HttpStatus`, `InvalidUrl`) when
    ///   no usable response is obtained
    /// - [`DownloadError::CreateFile`] when the destination cannot be created
    /// - [`DownloadError::Copy`] when the transfer breaks midway; the partial
    ///   file stays on disk
    #[must_use = "download result contains the number of bytes written"]
    #[instrument(skip(self), fields(url = %url, path = %file_path.display()))]
    pub async fn download_to_file(&self, url: &str, file_path: &Path) -> Result<u64, DownloadError> {
        let response = send_get(&self.file, url).await?;

        let mut file = File::create(file_path)
            .await
            .map_err(|e| DownloadError::create_file(file_path, e))?;

        let bytes_written = stream_to_file(&mut file, response, url, file_path).await?;
        debug!(bytes = bytes_written, "stream complete");
        Ok(bytes_written)
    }
}

async fn send_get(client: &Client, url: &str) -> Result<reqwest::Response, DownloadError> {
    Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DownloadError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::http_status(url, status.as_u16()));
    }
    Ok(response)
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk =
            chunk_result.map_err(|e| DownloadError::copy(url, file_path, bytes_written, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::copy(url, file_path, bytes_written, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::copy(url, file_path, bytes_written, e))?;

    Ok(bytes_written)
}

fn build_client(timeout: Duration) -> Result<Client, DownloadError> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|source| DownloadError::ClientBuild { source })
}
