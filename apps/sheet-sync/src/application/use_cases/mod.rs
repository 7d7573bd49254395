//! Sync use cases.
//!
//! One use case per stream, plus the run orchestrator that sequences them.
//! Every use case follows the same shape: resolve cursor, fetch range,
//! derive rows, append when non-empty.

mod run_sync;
mod sync_balances;
mod sync_fragments;
mod sync_orders;

use std::fmt;

use thiserror::Error;

use crate::application::ports::{CursorError, SinkError, StoreError};

pub use run_sync::{RunReport, RunSyncUseCase};
pub use sync_balances::SyncBalancesUseCase;
pub use sync_fragments::SyncFragmentsUseCase;
pub use sync_orders::{OrdersSyncOutcome, SyncOrdersUseCase};

/// The three independently synchronized entity feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Fulfilled orders.
    Orders,
    /// Fragments of fulfilled orders.
    Fragments,
    /// Balance snapshots.
    Balances,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Orders => "orders",
            Self::Fragments => "fragments",
            Self::Balances => "balances",
        };
        write!(f, "{name}")
    }
}

/// A failed sync run, tagged with the stream that aborted it.
///
/// There is no rollback: streams appended before the failure stay
/// committed, and the next run resumes from each stream's own cursor.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Cursor resolution against the sink failed.
    #[error("{stream} sync aborted, {source}")]
    Cursor {
        /// Stream that failed.
        stream: Stream,
        /// Underlying cursor error.
        #[source]
        source: CursorError,
    },

    /// An event store query failed.
    #[error("{stream} sync aborted, {source}")]
    Store {
        /// Stream that failed.
        stream: Stream,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// A sink append failed.
    #[error("{stream} sync aborted, {source}")]
    Sink {
        /// Stream that failed.
        stream: Stream,
        /// Underlying sink error.
        #[source]
        source: SinkError,
    },
}

impl SyncError {
    pub(crate) const fn cursor(stream: Stream, source: CursorError) -> Self {
        Self::Cursor { stream, source }
    }

    pub(crate) const fn store(stream: Stream, source: StoreError) -> Self {
        Self::Store { stream, source }
    }

    pub(crate) const fn sink(stream: Stream, source: SinkError) -> Self {
        Self::Sink { stream, source }
    }

    /// Stream whose sync aborted the run.
    #[must_use]
    pub const fn stream(&self) -> Stream {
        match self {
            Self::Cursor { stream, .. } | Self::Store { stream, .. } | Self::Sink { stream, .. } => {
                *stream
            }
        }
    }
}
