//! Balances sync use case.

use std::sync::Arc;

use chrono::DateTime;

use crate::application::ports::{CursorProviderPort, EventStorePort, TableSinkPort};
use crate::domain::derivation::balance_sheet_row;
use crate::domain::sheet::{BALANCES_SHEET, SheetRow};

use super::{Stream, SyncError};

/// Appends balance snapshots the sink does not have yet, each carrying the
/// launch count for the window since the previous snapshot.
pub struct SyncBalancesUseCase<St, Si, C> {
    store: Arc<St>,
    sink: Arc<Si>,
    cursors: Arc<C>,
}

impl<St, Si, C> SyncBalancesUseCase<St, Si, C>
where
    St: EventStorePort,
    Si: TableSinkPort,
    C: CursorProviderPort,
{
    /// Create a new balances sync.
    pub fn new(store: Arc<St>, sink: Arc<Si>, cursors: Arc<C>) -> Self {
        Self {
            store,
            sink,
            cursors,
        }
    }

    /// Execute the sync.
    ///
    /// The launch-count windows are a strict sequential fold: each row's
    /// window starts at the previous row's time (seeded from the watermark)
    /// and ends at its own, so windows never overlap or double-count.
    pub async fn execute(&self) -> Result<(usize, u64), SyncError> {
        let cursor = self
            .cursors
            .balances_cursor()
            .await
            .map_err(|e| SyncError::cursor(Stream::Balances, e))?;

        tracing::debug!(
            stream = %Stream::Balances,
            watermark = cursor.watermark,
            since = %format_epoch_millis(cursor.watermark),
            "Resolved cursor"
        );

        let balances = self
            .store
            .balances_after(cursor.watermark)
            .await
            .map_err(|e| SyncError::store(Stream::Balances, e))?;

        if balances.is_empty() {
            tracing::info!(stream = %Stream::Balances, "Nothing new to sync");
            return Ok((0, 0));
        }

        let mut rows: Vec<SheetRow> = Vec::with_capacity(balances.len());
        let mut previous_time = cursor.watermark;
        let mut sheet_row = cursor.next_row;

        for balance in &balances {
            let launches = self
                .store
                .count_launches_between(previous_time, balance.time)
                .await
                .map_err(|e| SyncError::store(Stream::Balances, e))?;

            rows.push(balance_sheet_row(balance, launches, sheet_row));

            previous_time = balance.time;
            sheet_row += 1;
        }

        let cells = self
            .sink
            .append(BALANCES_SHEET, &rows)
            .await
            .map_err(|e| SyncError::sink(Stream::Balances, e))?;

        tracing::info!(
            stream = %Stream::Balances,
            rows = rows.len(),
            cells,
            watermark = previous_time,
            "Appended"
        );

        Ok((rows.len(), cells))
    }
}

/// RFC 3339 rendering of an epoch-ms watermark, for log readability.
fn format_epoch_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |dt| dt.to_rfc3339())
}
