/// Workflow state for one background-removal session
///
/// The session owns the picked image, the processed result, the request
/// state and the preview handles for both images. Every change goes through
/// one of the `on_*` transitions below; the UI only reads.

use std::sync::Arc;
use thiserror::Error;

use super::data::{ProcessedImage, RequestState, RequestTicket, SourceImage};
use crate::media::loader::read_dimensions;
use crate::media::preview::{PreviewCategory, PreviewHandle, PreviewStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Remove was requested before any image was picked
    #[error("Please upload an image first.")]
    NoImage,
    /// A removal request is already in flight
    #[error("A request is already in progress.")]
    Busy,
}

#[derive(Debug, Default)]
pub struct Session {
    source: Option<SourceImage>,
    processed: Option<ProcessedImage>,
    request: RequestState,
    /// Read failure reported while a request was in flight
    load_error: Option<String>,
    previews: PreviewStore,
    /// Bumped on every new source; stale responses are dropped
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            previews: PreviewStore::new(),
            ..Self::default()
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn processed(&self) -> Option<&ProcessedImage> {
        self.processed.as_ref()
    }

    pub fn request_state(&self) -> &RequestState {
        &self.request
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_loading()
    }

    /// Inline error text: the request error, else a pending load error
    pub fn error(&self) -> Option<&str> {
        self.request.error().or(self.load_error.as_deref())
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn original_preview(&self) -> Option<&PreviewHandle> {
        self.previews.get(PreviewCategory::Original)
    }

    pub fn processed_preview(&self) -> Option<&PreviewHandle> {
        self.previews.get(PreviewCategory::Processed)
    }

    /// Whether the Remove button should be enabled
    pub fn can_remove(&self) -> bool {
        self.source.is_some() && !self.is_loading()
    }

    /// A file was picked (or the dialog was cancelled with `None`)
    pub fn on_file_selected(&mut self, file: Option<SourceImage>) {
        let Some(file) = file else {
            return;
        };

        self.generation += 1;
        self.previews
            .replace(PreviewCategory::Original, Some(file.bytes.clone()));
        self.source = Some(file);
        self.set_processed(None);
        self.load_error = None;

        if self.request.error().is_some() {
            self.request = RequestState::Idle;
        }
    }

    /// The picked file could not be read
    ///
    /// While a request is in flight the request state is left alone and the
    /// message is kept aside until the next upload or request start.
    pub fn on_load_failed(&mut self, message: String) {
        if self.is_loading() {
            tracing::warn!(%message, "load failed while a request is in flight");
            self.load_error = Some(message);
            return;
        }
        self.request = RequestState::Error(message);
    }

    /// Begin a removal request
    ///
    /// Returns the ticket to hand back on completion and the payload to upload.
    pub fn on_request_started(&mut self) -> Result<(RequestTicket, SourceImage), SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }

        let Some(source) = &self.source else {
            self.request = RequestState::Error(SessionError::NoImage.to_string());
            return Err(SessionError::NoImage);
        };

        self.request = RequestState::Loading;
        self.load_error = None;
        let ticket = RequestTicket {
            generation: self.generation,
        };
        Ok((ticket, source.clone()))
    }

    /// The backend returned the processed image
    ///
    /// Returns false if the response belonged to a source that has since
    /// been replaced; it is then dropped.
    pub fn on_request_succeeded(&mut self, ticket: RequestTicket, bytes: Vec<u8>) -> bool {
        self.request = RequestState::Idle;

        if ticket.generation != self.generation {
            tracing::debug!("dropping response for a replaced image");
            return false;
        }

        let bytes: Arc<[u8]> = Arc::from(bytes);
        let dimensions = read_dimensions(&bytes);
        self.set_processed(Some(ProcessedImage { bytes, dimensions }));
        true
    }

    /// The request failed; `message` is shown inline
    pub fn on_request_failed(&mut self, ticket: RequestTicket, message: String) {
        if ticket.generation != self.generation {
            self.request = RequestState::Idle;
            return;
        }
        self.request = RequestState::Error(message);
    }

    /// Preview to save when the user clicks Download
    pub fn download_target(&self) -> Option<&PreviewHandle> {
        self.processed_preview()
    }

    fn set_processed(&mut self, processed: Option<ProcessedImage>) {
        let bytes = processed.as_ref().map(|p| p.bytes.clone());
        self.previews.replace(PreviewCategory::Processed, bytes);
        self.processed = processed;
    }
}
