//! Target directory preparation.

use std::io;
use std::path::Path;

use tracing::{debug, info};

use super::error::DownloadError;

/// Creates `dir` (and any missing parents) if it does not exist yet.
///
/// Returns `true` when the directory was created by this call.
///
/// # Errors
///
/// Returns [`DownloadError::CreateDir`] if the directory cannot be created,
/// or if `dir` already exists as something other than a directory.
pub async fn prepare_target_dir(dir: &Path) -> Result<bool, DownloadError> {
    match tokio::fs::metadata(dir).await {
        Ok(metadata) if metadata.is_dir() => {
            debug!(dir = %dir.display(), "target directory exists");
            return Ok(false);
        }
        Ok(_) => {
            return Err(DownloadError::create_dir(
                dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(DownloadError::create_dir(dir, e)),
    }

    info!(dir = %dir.display(), "creating target directory");
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DownloadError::create_dir(dir, e))?;
    Ok(true)
}
