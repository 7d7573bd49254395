//! Fragments sync use case.

use std::sync::Arc;

use crate::application::ports::{CursorProviderPort, EventStorePort, TableSinkPort};
use crate::domain::derivation::fragment_sheet_row;
use crate::domain::sheet::{FRAGMENTS_SHEET, SheetRow};

use super::{Stream, SyncError};

/// Appends fragments of fulfilled orders the sink does not have yet.
///
/// Runs after the orders sync, but resolves its own watermark from the
/// sink's fragment data instead of trusting the orders outcome: if a
/// previous run appended orders and crashed before appending fragments,
/// this picks the gap back up.
pub struct SyncFragmentsUseCase<St, Si, C> {
    store: Arc<St>,
    sink: Arc<Si>,
    cursors: Arc<C>,
}

impl<St, Si, C> SyncFragmentsUseCase<St, Si, C>
where
    St: EventStorePort,
    Si: TableSinkPort,
    C: CursorProviderPort,
{
    /// Create a new fragments sync.
    pub fn new(store: Arc<St>, sink: Arc<Si>, cursors: Arc<C>) -> Self {
        Self {
            store,
            sink,
            cursors,
        }
    }

    /// Execute the sync for fragments of orders up to `last_order_id`, the
    /// order stream's watermark after the orders sync.
    pub async fn execute(&self, last_order_id: i64) -> Result<(usize, u64), SyncError> {
        let cursor = self
            .cursors
            .fragments_cursor()
            .await
            .map_err(|e| SyncError::cursor(Stream::Fragments, e))?;

        tracing::debug!(
            stream = %Stream::Fragments,
            watermark = cursor.watermark,
            last_order_id,
            "Resolved cursor"
        );

        if cursor.watermark >= last_order_id {
            tracing::info!(stream = %Stream::Fragments, "Nothing new to sync");
            return Ok((0, 0));
        }

        let fragments = self
            .store
            .fragments_in_range(cursor.watermark, last_order_id)
            .await
            .map_err(|e| SyncError::store(Stream::Fragments, e))?;

        if fragments.is_empty() {
            tracing::info!(stream = %Stream::Fragments, "Nothing new to sync");
            return Ok((0, 0));
        }

        let rows: Vec<SheetRow> = fragments.iter().map(fragment_sheet_row).collect();

        let cells = self
            .sink
            .append(FRAGMENTS_SHEET, &rows)
            .await
            .map_err(|e| SyncError::sink(Stream::Fragments, e))?;

        tracing::info!(
            stream = %Stream::Fragments,
            rows = rows.len(),
            cells,
            watermark = last_order_id,
            "Appended"
        );

        Ok((rows.len(), cells))
    }
}
