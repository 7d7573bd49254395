//! Infrastructure layer - adapters for the event store and the sink.

/// SQLite event store adapter (turso).
pub mod store;

/// Google Sheets sink adapter (reqwest).
pub mod sheets;
