use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the backend base URL
pub const BACKEND_URL_ENV: &str = "RMBG_BACKEND_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No backend URL configured. Set {} or `backend_url` in {path}", BACKEND_URL_ENV)]
    MissingBackendUrl { path: String },
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk config file layout
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    backend_url: Option<String>,
}

/// Settings resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the background-removal service, without trailing slash
    pub backend_url: String,
}

impl AppConfig {
    /// Resolve the configuration.
    ///
    /// The environment variable wins over the config file:
    /// - Linux: ~/.config/bg-remover/config.json
    /// - macOS: ~/Library/Application Support/bg-remover/config.json
    /// - Windows: %APPDATA%\bg-remover\config.json
    pub fn load() -> Result<Self, ConfigError> {
        let from_env = std::env::var(BACKEND_URL_ENV).ok();
        Self::resolve(from_env, Self::config_path().as_deref())
    }

    fn resolve(from_env: Option<String>, file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(url) = from_env.filter(|url| !url.trim().is_empty()) {
            tracing::debug!("backend URL taken from {}", BACKEND_URL_ENV);
            return Self::from_url(&url);
        }

        if let Some(path) = file.filter(|path| path.exists()) {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let parsed: ConfigFile =
                serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;

            if let Some(url) = parsed.backend_url {
                tracing::debug!(path = %path.display(), "backend URL taken from config file");
                return Self::from_url(&url);
            }
        }

        Err(ConfigError::MissingBackendUrl {
            path: file
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "the config file".to_string()),
        })
    }

    /// Validate and normalize a backend base URL
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let invalid = |reason: String| ConfigError::InvalidBackendUrl {
            url: raw.to_string(),
            reason,
        };

        let url = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self {
            backend_url: trimmed.to_string(),
        })
    }

    /// Get the path where the config file is looked up
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("bg-remover");
        path.push("config.json");
        Some(path)
    }
}
