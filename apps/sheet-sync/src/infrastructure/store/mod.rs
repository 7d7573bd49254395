//! Event store adapter.

mod sqlite;

pub use sqlite::SqliteEventStore;
