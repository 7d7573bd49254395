//! Sheets adapter errors.

use thiserror::Error;

use crate::application::ports::SinkError;

/// Errors from the Sheets API adapter.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Token file missing/invalid or the refresh was rejected.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// The API rejected the request.
    #[error("sheets api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the API error body.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("failed to parse response: {0}")]
    JsonParse(String),

    /// Transient failures persisted past the retry budget.
    #[error("max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Attempts made.
        attempts: u32,
    },
}

impl From<SheetsError> for SinkError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Network(msg) => Self::Unavailable(msg),
            SheetsError::MaxRetriesExceeded { attempts } => {
                Self::Unavailable(format!("max retries exceeded after {attempts} attempts"))
            }
            SheetsError::Auth(msg) => Self::Auth(msg),
            SheetsError::Api { status, message } => Self::Api { status, message },
            SheetsError::JsonParse(msg) => Self::InvalidResponse(msg),
        }
    }
}
