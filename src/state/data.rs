/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the loader, the remote client and the UI layer.

use std::sync::Arc;

/// An image picked by the user, before processing
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// Filename only (e.g., "cat.png")
    pub file_name: String,
    /// MIME type sent with the upload (e.g., "image/png")
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Arc<[u8]>,
    /// Pixel dimensions, when the format could be read
    pub dimensions: Option<(u32, u32)>,
}

impl SourceImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Image returned by the background-removal service
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Response body, untouched
    pub bytes: Arc<[u8]>,
    /// Pixel dimensions, when the format could be read
    pub dimensions: Option<(u32, u32)>,
}

/// State of the single remote request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// Error text to display inline, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Binds an in-flight request to the source it was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub(crate) generation: u64,
}

/// Human-readable byte size for the status line
pub fn format_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    let len = len as f64;
    if len < KB {
        format!("{} B", len as usize)
    } else if len < KB * KB {
        format!("{:.1} KB", len / KB)
    } else {
        format!("{:.1} MB", len / KB / KB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_error_text() {
        assert_eq!(RequestState::Idle.error(), None);
        assert_eq!(RequestState::Loading.error(), None);
        assert!(RequestState::Loading.is_loading());
        assert_eq!(RequestState::Error("boom".into()).error(), Some("boom"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(500 * 1024), "500.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }
}
