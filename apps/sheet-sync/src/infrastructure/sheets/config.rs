//! Sheets adapter configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default Sheets API endpoint.
const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default OAuth token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Configuration for the Sheets sink.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Target spreadsheet id.
    pub spreadsheet_id: String,
    /// Path to the authorized-user token file.
    pub token_path: PathBuf,
    /// Sheets API base URL. Overridable for tests.
    pub base_url: String,
    /// OAuth token endpoint. Overridable for tests.
    pub token_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry behavior for transient failures.
    pub retry: RetryConfig,
}

impl SheetsConfig {
    /// Config with production endpoints.
    #[must_use]
    pub fn new(spreadsheet_id: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            token_path: token_path.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the OAuth token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

/// Retry configuration for transient Sheets API failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts before giving up.
    pub max_attempts: u32,
    /// First backoff delay.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    /// Backoff growth factor.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(16),
            multiplier: 2.0,
        }
    }
}
