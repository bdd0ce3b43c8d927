/// HTTP client for the background-removal backend
///
/// Wire contract:
/// - `POST {base}/rmbg` with a multipart body holding one part named `file`
/// - a 2xx response carries the processed image as raw bytes
/// - any other status is a failure, the body is never parsed

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::state::data::SourceImage;

/// Path of the removal endpoint, relative to the backend base URL
pub const REMOVE_PATH: &str = "/rmbg";

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Message shown for any non-success HTTP status
pub const REMOVAL_FAILED_MESSAGE: &str = "Failed to remove background. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Backend answered with a non-success status
    #[error("Failed to remove background. Please try again.")]
    Status(u16),
    /// Request could not be built, sent, or its body read
    #[error("{0}")]
    Transport(String),
}

impl RemoteError {
    /// Text for the inline error display
    ///
    /// Transport errors without a usable message fall back to the
    /// generic failure text so the user always gets feedback.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Transport(message) if !message.trim().is_empty() => message.clone(),
            _ => REMOVAL_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.to_string())
    }
}

/// Body of `GET {base}/`
#[derive(Debug, Deserialize)]
struct Welcome {
    message: String,
}

/// Client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    /// Create a client for `base_url` (no trailing slash expected)
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload `source` and return the processed image bytes
    ///
    /// One attempt, no timeout. The caller owns the loading state.
    pub async fn remove_background(&self, source: SourceImage) -> Result<Vec<u8>, RemoteError> {
        let url = self.endpoint(REMOVE_PATH);
        tracing::info!(%url, file = %source.file_name, len = source.len(), "uploading image");

        let part = Part::bytes(source.bytes.to_vec())
            .file_name(source.file_name.clone())
            .mime_str(&source.mime_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.http.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "background removal rejected");
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        tracing::info!(len = body.len(), "received processed image");
        Ok(body.to_vec())
    }

    /// Ask the backend for its welcome message
    pub async fn welcome(&self) -> Result<String, RemoteError> {
        let response = self.http.get(self.endpoint("/")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let welcome: Welcome = response.json().await?;
        Ok(welcome.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::{contains, serve_once};
    use std::sync::Arc;

    fn source(bytes: Vec<u8>) -> SourceImage {
        SourceImage {
            file_name: "cat.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: Arc::from(bytes),
            dimensions: None,
        }
    }

    #[tokio::test]
    async fn test_upload_is_multipart_post_to_rmbg() {
        let payload = b"\x89PNG fake cat pixels".to_vec();
        let (base, request) = serve_once(200, b"nobg".to_vec()).await;

        let client = RemoteClient::new(base).unwrap();
        let body = client.remove_background(source(payload.clone())).await.unwrap();
        let request = request.await.unwrap();

        assert_eq!(body, b"nobg".to_vec());
        assert!(request.starts_with(b"POST /rmbg HTTP/1.1\r\n"));
        assert!(contains(&request, b"multipart/form-data; boundary="));
        assert!(contains(&request, b"name=\"file\"; filename=\"cat.png\""));
        assert!(contains(&request, b"Content-Type: image/png"));
        assert!(contains(&request, &payload));
    }

    #[tokio::test]
    async fn test_non_success_status_is_generic_failure() {
        let (base, _request) = serve_once(500, b"{\"detail\":\"Internal server error.\"}".to_vec()).await;

        let client = RemoteClient::new(base).unwrap();
        let err = client.remove_background(source(vec![1, 2, 3])).await.unwrap_err();

        assert_eq!(err, RemoteError::Status(500));
        assert_eq!(err.user_message(), REMOVAL_FAILED_MESSAGE);
        assert_eq!(err.to_string(), REMOVAL_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RemoteClient::new(format!("http://{}", addr)).unwrap();
        let err = client.remove_background(source(vec![1])).await.unwrap_err();

        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn test_welcome_reads_backend_message() {
        let body = br#"{"message":"Welcome to the Remove Background API!"}"#.to_vec();
        let (base, request) = serve_once(200, body).await;

        let client = RemoteClient::new(format!("{}/", base)).unwrap();
        let message = client.welcome().await.unwrap();

        assert_eq!(message, "Welcome to the Remove Background API!");
        assert!(request.await.unwrap().starts_with(b"GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_blank_transport_message_falls_back() {
        assert_eq!(RemoteError::Transport("  ".into()).user_message(), REMOVAL_FAILED_MESSAGE);
        assert_eq!(RemoteError::Transport("connection refused".into()).user_message(), "connection refused");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RemoteClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint(REMOVE_PATH), "http://localhost:8000/rmbg");
    }
}
