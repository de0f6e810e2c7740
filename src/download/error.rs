//! Error types for the download module.
//!
//! Every failure carries the URL or path it concerns. Errors fall into three
//! classes (see [`ErrorClass`]): fetch and filesystem failures end the whole
//! run, copy failures only fail the task that hit them.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed source for copy failures, which may come from the network or the disk.
pub type CopySource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`DownloadError`], used by the driver to decide
/// whether a failure is fatal for the run or local to a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Failure acquiring a response (page or file) or scanning a page.
    Fetch,
    /// Failure creating the target directory or a destination file.
    Filesystem,
    /// Failure while moving bytes from a live response into a file.
    Copy,
}

/// Errors that can occur while fetching pages or downloading files.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the response arrived.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The listing page markup could not be scanned.
    #[error("failed to scan listing page {url}: {source}")]
    PageScan {
        /// The page being scanned.
        url: String,
        /// The rewriter error that stopped the scan.
        #[source]
        source: lol_html::errors::RewritingError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be created.
    #[error("failed to create file {path}: {source}")]
    CreateFile {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL has no final path segment to name the destination file after.
    #[error("no file name in URL {url}")]
    NoFileName {
        /// The URL ending in a separator.
        url: String,
    },

    /// The transfer broke after the file was created.
    ///
    /// The partially written file is left on disk.
    #[error("copy failed for {url} into {path} after {bytes_written} bytes: {source}")]
    Copy {
        /// The URL being downloaded.
        url: String,
        /// The destination path holding the partial data.
        path: PathBuf,
        /// Bytes written before the failure.
        bytes_written: u64,
        /// The network or disk error that interrupted the copy.
        #[source]
        source: CopySource,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a page scan error.
    pub fn page_scan(url: impl Into<String>, source: lol_html::errors::RewritingError) -> Self {
        Self::PageScan {
            url: url.into(),
            source,
        }
    }

    /// Creates a directory creation error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a file creation error.
    pub fn create_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing file name error.
    pub fn no_file_name(url: impl Into<String>) -> Self {
        Self::NoFileName { url: url.into() }
    }

    /// Creates a copy error.
    pub fn copy(
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        bytes_written: u64,
        source: impl Into<CopySource>,
    ) -> Self {
        Self::Copy {
            url: url.into(),
            path: path.into(),
            bytes_written,
            source: source.into(),
        }
    }

    /// Returns the class this error belongs to.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::InvalidUrl { .. }
            | Self::PageScan { .. }
            | Self::ClientBuild { .. } => ErrorClass::Fetch,
            Self::CreateDir { .. } | Self::CreateFile { .. } | Self::NoFileName { .. } => {
                ErrorClass::Filesystem
            }
            Self::Copy { .. } => ErrorClass::Copy,
        }
    }

    /// Returns true when this error must end the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.class() != ErrorClass::Copy
    }
}
