/// Remote background-removal service
///
/// `client.rs` holds the HTTP client and its error type. The backend itself
/// is an external service and is not part of this crate.

pub mod client;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{RemoteClient, RemoteError};
