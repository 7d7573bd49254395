//! Google Sheets sink adapter.
//!
//! Implements `TableSinkPort` over the Sheets v4 values API: `GET values/`
//! for trailing-data reads and `POST values/...:append` with user-entered
//! input semantics so the sink parses numbers and evaluates formulas.

mod adapter;
mod api_types;
mod auth;
mod config;
mod error;

pub use adapter::SheetsSink;
pub use auth::TokenManager;
pub use config::{RetryConfig, SheetsConfig};
pub use error::SheetsError;
