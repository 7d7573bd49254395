//! Cursor Provider Port (Driven)
//!
//! Tells each stream where it left off. The default provider derives the
//! cursor from the sink's own trailing data, so no checkpoint state exists
//! outside the sink itself; swapping in a real checkpoint store only means
//! implementing this port differently.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::sink_port::{SinkError, TableSinkPort};

/// Sink range holding already-synced order ids.
const ORDERS_ID_RANGE: &str = "Orders!A:A";

/// Sink range holding already-synced composed-order ids.
const FRAGMENTS_ORDER_RANGE: &str = "Fragments!H:H";

/// Sink range holding already-synced balance times.
const BALANCES_TIME_RANGE: &str = "Balances!C:C";

/// Errors from cursor resolution.
#[derive(Debug, Error)]
pub enum CursorError {
    /// Reading the sink's trailing data failed.
    #[error("cursor resolution failed: {0}")]
    Sink(#[from] SinkError),
}

/// Where a stream left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCursor {
    /// Highest already-synced identifier or timestamp, 0 when none.
    pub watermark: i64,
    /// 1-based sink row the next appended row will land on.
    pub next_row: u32,
}

/// Per-stream cursor resolution.
#[async_trait]
pub trait CursorProviderPort: Send + Sync {
    /// Cursor for the orders stream (trailing id).
    async fn orders_cursor(&self) -> Result<ResolvedCursor, CursorError>;

    /// Cursor for the fragments stream (maximum composed-order id).
    async fn fragments_cursor(&self) -> Result<ResolvedCursor, CursorError>;

    /// Cursor for the balances stream (trailing snapshot time).
    async fn balances_cursor(&self) -> Result<ResolvedCursor, CursorError>;
}

/// Default cursor provider: derives each cursor from the sink's own data.
///
/// Correctness depends on the sink never being reordered or truncated out
/// of append order, and on a single writer per sink. A trailing value that
/// does not parse as an integer is treated like an empty range (watermark
/// 0) but logged at warn level, since it can also mean sink corruption.
pub struct SheetCursorProvider<S> {
    sink: Arc<S>,
}

impl<S: TableSinkPort> SheetCursorProvider<S> {
    /// Create a provider reading through the given sink.
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Last value of the range, parsed as an integer.
    async fn trailing_cursor(&self, range: &str) -> Result<ResolvedCursor, CursorError> {
        let values = self.sink.read(range).await?;
        let watermark = trailing_value(range, &values);
        Ok(ResolvedCursor {
            watermark,
            next_row: next_row(&values),
        })
    }
}

#[async_trait]
impl<S: TableSinkPort> CursorProviderPort for SheetCursorProvider<S> {
    async fn orders_cursor(&self) -> Result<ResolvedCursor, CursorError> {
        self.trailing_cursor(ORDERS_ID_RANGE).await
    }

    async fn fragments_cursor(&self) -> Result<ResolvedCursor, CursorError> {
        // Fragments are appended in order-id batches but carry no identity
        // of their own, so the watermark is the maximum composed-order id
        // already present rather than the trailing cell.
        let values = self.sink.read(FRAGMENTS_ORDER_RANGE).await?;
        Ok(ResolvedCursor {
            watermark: max_value(&values),
            next_row: next_row(&values),
        })
    }

    async fn balances_cursor(&self) -> Result<ResolvedCursor, CursorError> {
        self.trailing_cursor(BALANCES_TIME_RANGE).await
    }
}

/// Integer value of the last cell in the range, 0 when the range is empty.
fn trailing_value(range: &str, values: &[Vec<String>]) -> i64 {
    let Some(cell) = values.last().and_then(|row| row.first()) else {
        return 0;
    };
    match cell.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                range,
                value = %cell,
                "Trailing sink value is not an integer, assuming no prior watermark"
            );
            0
        }
    }
}

/// Maximum integer value in the range, 0 when none parse. Non-numeric cells
/// (typically the header row) are skipped.
fn max_value(values: &[Vec<String>]) -> i64 {
    values
        .iter()
        .filter_map(|row| row.first())
        .filter_map(|cell| cell.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
}

/// 1-based row the next append lands on, given the rows currently present.
#[allow(clippy::cast_possible_truncation)]
fn next_row(values: &[Vec<String>]) -> u32 {
    values.len() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sheet::SheetRow;
    use std::collections::HashMap;

    struct FixedSink {
        sheets: HashMap<&'static str, Vec<Vec<String>>>,
    }

    impl FixedSink {
        fn new(sheets: impl IntoIterator<Item = (&'static str, Vec<Vec<String>>)>) -> Self {
            Self {
                sheets: sheets.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl TableSinkPort for FixedSink {
        async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SinkError> {
            Ok(self.sheets.get(range).cloned().unwrap_or_default())
        }

        async fn append(&self, _destination: &str, _rows: &[SheetRow]) -> Result<u64, SinkError> {
            unreachable!("cursor resolution never appends")
        }
    }

    fn column(cells: &[&str]) -> Vec<Vec<String>> {
        cells.iter().map(|c| vec![(*c).to_string()]).collect()
    }

    #[tokio::test]
    async fn trailing_cursor_returns_last_value() {
        let sink = FixedSink::new([(ORDERS_ID_RANGE, column(&["id", "5", "6", "7"]))]);
        let provider = SheetCursorProvider::new(Arc::new(sink));

        let cursor = provider.orders_cursor().await.unwrap();
        assert_eq!(cursor.watermark, 7);
        assert_eq!(cursor.next_row, 5);
    }

    #[tokio::test]
    async fn empty_range_defaults_to_zero() {
        let sink = FixedSink::new([]);
        let provider = SheetCursorProvider::new(Arc::new(sink));

        let cursor = provider.balances_cursor().await.unwrap();
        assert_eq!(cursor.watermark, 0);
        assert_eq!(cursor.next_row, 1);
    }

    #[tokio::test]
    async fn non_numeric_trailing_value_defaults_to_zero() {
        let sink = FixedSink::new([(ORDERS_ID_RANGE, column(&["id"]))]);
        let provider = SheetCursorProvider::new(Arc::new(sink));

        let cursor = provider.orders_cursor().await.unwrap();
        assert_eq!(cursor.watermark, 0);
        assert_eq!(cursor.next_row, 2);
    }

    #[tokio::test]
    async fn fragment_cursor_scans_for_maximum() {
        // Fragment batches are ordered by fragment id, not composed order,
        // so the largest already-synced order id may not be trailing.
        let sink = FixedSink::new([(FRAGMENTS_ORDER_RANGE, column(&["order", "12", "14", "13"]))]);
        let provider = SheetCursorProvider::new(Arc::new(sink));

        let cursor = provider.fragments_cursor().await.unwrap();
        assert_eq!(cursor.watermark, 14);
    }
}
