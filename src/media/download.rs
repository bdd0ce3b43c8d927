/// Saving the processed image to disk

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default file name offered in the save dialog
pub const DOWNLOAD_FILE_NAME: &str = "removed_background.png";

#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    #[error("Failed to save {path}: {message}")]
    Io { path: String, message: String },
    #[error("Task join error: {0}")]
    Join(String),
}

/// Write `bytes` to `dest`, replacing any existing file
///
/// The data goes to a uniquely named temp file in the destination directory
/// and is persisted into place, so a failed write never leaves a truncated
/// image behind and concurrent saves never share a temp file.
pub async fn save_processed(bytes: Arc<[u8]>, dest: PathBuf) -> Result<PathBuf, DownloadError> {
    tokio::task::spawn_blocking(move || save_processed_blocking(&bytes, &dest))
        .await
        .map_err(|e| DownloadError::Join(e.to_string()))?
}

fn save_processed_blocking(bytes: &[u8], dest: &Path) -> Result<PathBuf, DownloadError> {
    let io_err = |e: std::io::Error| DownloadError::Io {
        path: dest.display().to_string(),
        message: e.to_string(),
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(bytes).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(dest).map_err(|e| io_err(e.error))?;

    tracing::info!(path = %dest.display(), len = bytes.len(), "saved processed image");
    Ok(dest.to_path_buf())
}
