/// Source image loader
///
/// Reads a user-picked file into memory and figures out what it is.
/// No validation happens here: whatever the user picked is uploaded as-is,
/// the dialog filter is only a hint.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task;

use crate::state::data::SourceImage;

/// MIME type used when neither content nor extension says anything
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Task join error: {0}")]
    Join(String),
}

/// Load a picked file as a `SourceImage`
///
/// File I/O and format probing run on a blocking task.
pub async fn load_source(path: PathBuf) -> Result<SourceImage, LoadError> {
    task::spawn_blocking(move || load_source_blocking(&path))
        .await
        .map_err(|e| LoadError::Join(e.to_string()))?
}

fn load_source_blocking(path: &Path) -> Result<SourceImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let mime_type = detect_mime(path, &bytes).to_string();
    let dimensions = read_dimensions(&bytes);

    tracing::info!(
        file = %file_name,
        mime = %mime_type,
        len = bytes.len(),
        ?dimensions,
        "loaded source image"
    );

    Ok(SourceImage {
        file_name,
        mime_type,
        bytes: Arc::from(bytes),
        dimensions,
    })
}

/// Content sniffing first, then the file extension
pub fn detect_mime(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Read the pixel dimensions from the image header, if the format is known
pub fn read_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        let bytes = png_bytes(4, 3);
        std::fs::write(&path, &bytes).unwrap();

        let source = load_source(path).await.unwrap();

        assert_eq!(source.file_name, "cat.png");
        assert_eq!(source.mime_type, "image/png");
        assert_eq!(source.dimensions, Some((4, 3)));
        assert_eq!(&source.bytes[..], &bytes[..]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_source(PathBuf::from("/nonexistent/cat.png")).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_detect_mime_falls_back_to_extension() {
        let garbage = b"not really an image";
        assert_eq!(detect_mime(Path::new("photo.jpg"), garbage), "image/jpeg");
        assert_eq!(detect_mime(Path::new("notes.unknown"), garbage), FALLBACK_MIME);
    }

    #[test]
    fn test_content_wins_over_extension() {
        let bytes = png_bytes(1, 1);
        assert_eq!(detect_mime(Path::new("mislabeled.jpg"), &bytes), "image/png");
    }

    #[test]
    fn test_unknown_bytes_have_no_dimensions() {
        assert_eq!(read_dimensions(b"\x00\x01\x02"), None);
    }
}
