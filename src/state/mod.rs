/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The upload/remove/download workflow and its transitions (session.rs)

pub mod data;
pub mod session;

pub use session::{Session, SessionError};
