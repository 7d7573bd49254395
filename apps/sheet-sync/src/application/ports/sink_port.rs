//! Table Sink Port (Driven)
//!
//! The append-only tabular destination. The sink has no primary key; row
//! order is the only signal the engine can read back, which is why cursor
//! resolution inspects trailing data instead of a checkpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::sheet::SheetRow;

/// Errors from the sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink cannot be reached. Fatal for the run.
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// The sink rejected the call.
    #[error("sink api error (status {status}): {message}")]
    Api {
        /// HTTP status reported by the sink.
        status: u16,
        /// Message reported by the sink.
        message: String,
    },

    /// Credentials are missing, invalid, or could not be refreshed.
    #[error("sink authorization failed: {0}")]
    Auth(String),

    /// The sink answered with a payload the engine cannot interpret.
    #[error("sink returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Read and append access to the tabular sink.
#[async_trait]
pub trait TableSinkPort: Send + Sync {
    /// Read the cells in an A1 range, as rows of cell texts. Rows and cells
    /// trail off where the sheet has no content.
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SinkError>;

    /// Append rows after the existing data of `destination` (a sheet name).
    /// Returns the number of cells written.
    async fn append(&self, destination: &str, rows: &[SheetRow]) -> Result<u64, SinkError>;
}
