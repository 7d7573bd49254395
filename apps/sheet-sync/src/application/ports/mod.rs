//! Application Ports (Driven)
//!
//! Ports define the interfaces the sync engine consumes: the read-only
//! event store, the append-only tabular sink, and the cursor provider that
//! tells each stream where it left off.

mod cursor_port;
mod sink_port;
mod store_port;

pub use cursor_port::{CursorError, CursorProviderPort, ResolvedCursor, SheetCursorProvider};
pub use sink_port::{SinkError, TableSinkPort};
pub use store_port::{EventStorePort, StoreError};
