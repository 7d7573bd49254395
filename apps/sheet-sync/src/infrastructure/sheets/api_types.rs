//! Wire types for the Sheets v4 values API.

use serde::{Deserialize, Serialize};

use crate::domain::sheet::SheetRow;

/// Body of a `values:append` request.
#[derive(Debug, Serialize)]
pub(super) struct AppendBody<'a> {
    pub values: &'a [SheetRow],
}

/// Response of a `values/{range}` read.
#[derive(Debug, Deserialize)]
pub(super) struct ValueRange {
    /// Absent entirely when the range is empty.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// Response of a `values:append` call.
#[derive(Debug, Deserialize)]
pub(super) struct AppendResponse {
    pub updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
pub(super) struct AppendUpdates {
    #[serde(rename = "updatedCells", default)]
    pub updated_cells: u64,
}

/// Error body shape used across Google APIs.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

/// Authorized-user credentials, as written by the interactive
/// authorization flow.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Response of the OAuth refresh-token grant.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expiry_secs")]
    pub expires_in: u64,
}

const fn default_expiry_secs() -> u64 {
    3600
}
