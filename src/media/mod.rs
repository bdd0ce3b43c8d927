/// Image payload handling
///
/// This module handles:
/// - Reading picked files and probing their format (loader.rs)
/// - Revocable preview handles for rendering (preview.rs)
/// - Saving the processed result to disk (download.rs)

pub mod loader;
pub mod preview;
pub mod download;
