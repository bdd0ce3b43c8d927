/// Revocable preview handles for in-memory images
///
/// Each category (original upload, processed result) owns at most one live
/// handle. Replacing a category revokes the old handle before the new one is
/// installed, and dropping the store revokes everything that is still live.

use iced::widget::image::Handle;
use std::collections::HashMap;
use std::sync::Arc;

/// Which image a preview belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewCategory {
    Original,
    Processed,
}

/// Process-local identifier of a preview handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(u64);

/// A live reference to a binary payload, ready to render or save
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    id: PreviewId,
    bytes: Arc<[u8]>,
    image: Handle,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }

    /// The exact bytes this handle was derived from
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared owner of the bytes, for handing to a background task
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Handle for the iced image widget
    pub fn image(&self) -> &Handle {
        &self.image
    }
}

/// Owner of the live preview handles
#[derive(Debug, Default)]
pub struct PreviewStore {
    live: HashMap<PreviewCategory, PreviewHandle>,
    next_id: u64,
    issued: u64,
    revoked: u64,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke the current handle for `category` and install one for `bytes`.
    ///
    /// `None` clears the category with no replacement.
    pub fn replace(&mut self, category: PreviewCategory, bytes: Option<Arc<[u8]>>) -> Option<&PreviewHandle> {
        self.revoke(category);

        let bytes = bytes?;
        let id = PreviewId(self.next_id);
        self.next_id += 1;
        self.issued += 1;

        let image = Handle::from_bytes(bytes.to_vec());
        tracing::debug!(?category, id = id.0, len = bytes.len(), "preview handle issued");

        self.live.insert(category, PreviewHandle { id, bytes, image });
        self.live.get(&category)
    }

    /// Live handle for `category`, if any
    pub fn get(&self, category: PreviewCategory) -> Option<&PreviewHandle> {
        self.live.get(&category)
    }

    /// Whether `id` still refers to a live handle
    #[cfg(test)]
    pub fn is_live(&self, id: PreviewId) -> bool {
        self.live.values().any(|handle| handle.id == id)
    }

    /// Revoke every live handle
    pub fn clear(&mut self) {
        self.revoke(PreviewCategory::Original);
        self.revoke(PreviewCategory::Processed);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn revoked(&self) -> u64 {
        self.revoked
    }

    fn revoke(&mut self, category: PreviewCategory) {
        if let Some(old) = self.live.remove(&category) {
            self.revoked += 1;
            tracing::debug!(?category, id = old.id.0, "preview handle revoked");
        }
    }
}

impl Drop for PreviewStore {
    fn drop(&mut self) {
        self.clear();
    }
}
