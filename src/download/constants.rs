//! Constants for the download module (timeouts, concurrency bounds).

/// Default timeout for fetching a listing page (20 seconds).
pub const PAGE_TIMEOUT_SECS: u64 = 20;

/// Default timeout for fetching a single file (3 minutes for large audio files).
pub const FILE_TIMEOUT_SECS: u64 = 180;

/// Minimum allowed concurrency cap.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency cap.
pub const MAX_CONCURRENCY: usize = 100;
