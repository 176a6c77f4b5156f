//! Client configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "client=info,warn";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix, without trailing slash
    pub api_url: String,
    /// Upper bound on every request
    pub request_timeout: Duration,
    /// Where the session snapshot is persisted
    pub session_file: PathBuf,
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log level filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Mirror logs to stderr
    pub log_to_stderr: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file: PathBuf::from(".rewear/session.json"),
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_stderr: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: std::env::var("REWEAR_API_URL")
                .map(|url| normalize_base_url(&url))
                .unwrap_or(defaults.api_url),
            request_timeout: std::env::var("REWEAR_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            session_file: std::env::var("REWEAR_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            log_dir: std::env::var("REWEAR_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_to_stderr: std::env::var("REWEAR_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    /// Point the client at another backend
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_base_url(url);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(AppError::Config("REWEAR_API_URL is empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "REWEAR_API_URL must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config(
                "REWEAR_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Log file path of the current day's rotation target
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("client.log")
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
