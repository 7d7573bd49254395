//! Orders sync use case.

use std::sync::Arc;

use crate::application::ports::{CursorProviderPort, EventStorePort, TableSinkPort};
use crate::domain::derivation::order_sheet_row;
use crate::domain::sheet::{ORDERS_SHEET, SheetRow};

use super::{Stream, SyncError};

/// Result of one orders sync, consumed by the fragments sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersSyncOutcome {
    /// Order watermark before this sync.
    pub previous_id: i64,
    /// Order watermark after this sync: the id of the last appended order,
    /// or the previous watermark when nothing was appended. This is the
    /// upper bound of the fulfilled-order window known to the sink.
    pub last_id: i64,
    /// Rows appended.
    pub rows: usize,
    /// Cells written by the sink.
    pub cells: u64,
}

/// Appends fulfilled orders the sink does not have yet.
pub struct SyncOrdersUseCase<St, Si, C> {
    store: Arc<St>,
    sink: Arc<Si>,
    cursors: Arc<C>,
}

impl<St, Si, C> SyncOrdersUseCase<St, Si, C>
where
    St: EventStorePort,
    Si: TableSinkPort,
    C: CursorProviderPort,
{
    /// Create a new orders sync.
    pub fn new(store: Arc<St>, sink: Arc<Si>, cursors: Arc<C>) -> Self {
        Self {
            store,
            sink,
            cursors,
        }
    }

    /// Execute the sync: resolve cursor, fetch newer fulfilled orders,
    /// derive sink rows, append when non-empty.
    pub async fn execute(&self) -> Result<OrdersSyncOutcome, SyncError> {
        let cursor = self
            .cursors
            .orders_cursor()
            .await
            .map_err(|e| SyncError::cursor(Stream::Orders, e))?;

        tracing::debug!(
            stream = %Stream::Orders,
            watermark = cursor.watermark,
            "Resolved cursor"
        );

        let orders = self
            .store
            .orders_in_range(cursor.watermark, None)
            .await
            .map_err(|e| SyncError::store(Stream::Orders, e))?;

        if orders.is_empty() {
            tracing::info!(stream = %Stream::Orders, "Nothing new to sync");
            return Ok(OrdersSyncOutcome {
                previous_id: cursor.watermark,
                last_id: cursor.watermark,
                rows: 0,
                cells: 0,
            });
        }

        let rows: Vec<SheetRow> = orders
            .iter()
            .zip(cursor.next_row..)
            .map(|(order, sheet_row)| order_sheet_row(order, sheet_row))
            .collect();
        let last_id = orders.last().map_or(cursor.watermark, |order| order.id);

        let cells = self
            .sink
            .append(ORDERS_SHEET, &rows)
            .await
            .map_err(|e| SyncError::sink(Stream::Orders, e))?;

        tracing::info!(
            stream = %Stream::Orders,
            rows = rows.len(),
            cells,
            watermark = last_id,
            "Appended"
        );

        Ok(OrdersSyncOutcome {
            previous_id: cursor.watermark,
            last_id,
            rows: rows.len(),
            cells,
        })
    }
}
