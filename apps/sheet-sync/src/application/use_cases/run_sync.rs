//! Run orchestrator: one full pipeline pass.

use std::sync::Arc;

use crate::application::ports::{CursorProviderPort, EventStorePort, TableSinkPort};

use super::{SyncBalancesUseCase, SyncError, SyncFragmentsUseCase, SyncOrdersUseCase};

/// What one run appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Order rows appended.
    pub orders_rows: usize,
    /// Fragment rows appended.
    pub fragments_rows: usize,
    /// Balance rows appended.
    pub balances_rows: usize,
    /// Total cells written across all streams.
    pub cells_written: u64,
}

impl RunReport {
    /// True when the run appended nothing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.orders_rows == 0 && self.fragments_rows == 0 && self.balances_rows == 0
    }
}

/// Sequences the three stream syncs: orders, then fragments, then balances.
///
/// Fragments must follow orders because their upper bound is the order
/// stream's watermark, but every stream resolves its own cursor from the
/// sink, so a run that fails partway is safely resumed by the next one.
/// There is no cross-stream transaction and no automatic retry; a failure
/// aborts the run and leaves earlier appends committed.
///
/// Two concurrent runs against the same sink would resolve the same stale
/// cursors and double-append. Single-writer execution is the caller's
/// responsibility.
pub struct RunSyncUseCase<St, Si, C> {
    orders: SyncOrdersUseCase<St, Si, C>,
    fragments: SyncFragmentsUseCase<St, Si, C>,
    balances: SyncBalancesUseCase<St, Si, C>,
}

impl<St, Si, C> RunSyncUseCase<St, Si, C>
where
    St: EventStorePort,
    Si: TableSinkPort,
    C: CursorProviderPort,
{
    /// Wire the three stream syncs over shared collaborators.
    pub fn new(store: Arc<St>, sink: Arc<Si>, cursors: Arc<C>) -> Self {
        Self {
            orders: SyncOrdersUseCase::new(
                Arc::clone(&store),
                Arc::clone(&sink),
                Arc::clone(&cursors),
            ),
            fragments: SyncFragmentsUseCase::new(
                Arc::clone(&store),
                Arc::clone(&sink),
                Arc::clone(&cursors),
            ),
            balances: SyncBalancesUseCase::new(store, sink, cursors),
        }
    }

    /// Execute one pipeline pass.
    pub async fn execute(&self) -> Result<RunReport, SyncError> {
        let orders = self.orders.execute().await?;
        let (fragments_rows, fragments_cells) = self.fragments.execute(orders.last_id).await?;
        let (balances_rows, balances_cells) = self.balances.execute().await?;

        Ok(RunReport {
            orders_rows: orders.rows,
            fragments_rows,
            balances_rows,
            cells_written: orders.cells + fragments_cells + balances_cells,
        })
    }
}
