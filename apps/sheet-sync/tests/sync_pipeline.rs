//! End-to-end pipeline tests over in-memory store and sink fakes.
//!
//! The fakes mirror the contracts of the real adapters: the store serves
//! ascending range queries, the sink is append-only and readable by A1
//! column ranges. Everything between them (cursor resolution, derivation,
//! orchestration) is the real code under test.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use sheet_sync::application::ports::{
    EventStorePort, SheetCursorProvider, SinkError, StoreError, TableSinkPort,
};
use sheet_sync::application::use_cases::{RunSyncUseCase, Stream};
use sheet_sync::domain::model::{Balance, EpochMillis, Fragment, Order, OrderStatus, Side};
use sheet_sync::domain::sheet::SheetRow;

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct FakeStore {
    orders: Vec<Order>,
    fragments: Vec<Fragment>,
    balances: Vec<Balance>,
    launch_times: Vec<EpochMillis>,
}

#[async_trait]
impl EventStorePort for FakeStore {
    async fn orders_in_range(
        &self,
        previous_id: i64,
        last_id: Option<i64>,
    ) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.status.is_fulfilled())
            .filter(|o| o.id > previous_id && last_id.is_none_or(|last| o.id <= last))
            .cloned()
            .collect())
    }

    async fn fragments_in_range(
        &self,
        previous_order_id: i64,
        last_order_id: i64,
    ) -> Result<Vec<Fragment>, StoreError> {
        Ok(self
            .fragments
            .iter()
            .filter(|f| f.composed_order > previous_order_id && f.composed_order <= last_order_id)
            .cloned()
            .collect())
    }

    async fn balances_after(&self, previous_time: EpochMillis) -> Result<Vec<Balance>, StoreError> {
        Ok(self
            .balances
            .iter()
            .filter(|b| b.time > previous_time)
            .cloned()
            .collect())
    }

    async fn count_launches_between(
        &self,
        previous_time: EpochMillis,
        time: EpochMillis,
    ) -> Result<i64, StoreError> {
        Ok(self
            .launch_times
            .iter()
            .filter(|t| **t > previous_time && **t <= time)
            .count() as i64)
    }
}

/// Append-only sheet fake that records every write as rendered cell text.
#[derive(Default)]
struct SpySink {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    appends: AtomicUsize,
}

impl SpySink {
    /// Pre-populate a sheet, simulating rows synced by earlier runs.
    fn seed(&self, sheet: &str, rows: &[&[&str]]) {
        let mut sheets = self.sheets.lock().unwrap();
        let entry = sheets.entry(sheet.to_string()).or_default();
        for row in rows {
            entry.push(row.iter().map(ToString::to_string).collect());
        }
    }

    fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }

    fn column(&self, sheet: &str, index: usize) -> Vec<String> {
        self.rows(sheet)
            .iter()
            .filter_map(|row| row.get(index).cloned())
            .collect()
    }

    fn append_calls(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableSinkPort for SpySink {
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SinkError> {
        let (sheet, column) = range
            .split_once('!')
            .ok_or_else(|| SinkError::InvalidResponse(format!("bad range: {range}")))?;
        let index = (column.as_bytes()[0] - b'A') as usize;

        Ok(self
            .rows(sheet)
            .iter()
            .map(|row| row.get(index).cloned().map_or_else(Vec::new, |c| vec![c]))
            .collect())
    }

    async fn append(&self, destination: &str, rows: &[SheetRow]) -> Result<u64, SinkError> {
        self.appends.fetch_add(1, Ordering::SeqCst);

        let mut cells = 0;
        let mut sheets = self.sheets.lock().unwrap();
        let entry = sheets.entry(destination.to_string()).or_default();
        for row in rows {
            cells += row.len() as u64;
            entry.push(row.iter().map(|cell| cell.render()).collect());
        }
        Ok(cells)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn fulfilled_order(id: i64) -> Order {
    Order {
        id,
        base: "DOGE".to_string(),
        quote: "BUSD".to_string(),
        side: Side::Buy,
        quantity: dec!(100),
        loan: dec!(0),
        fragments_rate: dec!(0.25),
        execution_rate: dec!(0.26),
        status: OrderStatus::Fulfilled,
        activation_time: id * 1_000,
        fulfill_time: id * 1_000 + 500,
        taken_home: dec!(26),
        exchange_id: id * 10,
    }
}

fn pending_order(id: i64) -> Order {
    Order {
        status: OrderStatus::Active,
        ..fulfilled_order(id)
    }
}

fn fragment(id: i64, composed_order: i64) -> Fragment {
    Fragment {
        id,
        base: "DOGE".to_string(),
        quote: "BUSD".to_string(),
        amount: dec!(12.5),
        target_rate: dec!(0.3),
        side: Side::Buy,
        spawning_order: composed_order - 1,
        composed_order,
    }
}

fn balance(id: i64, time: EpochMillis) -> Balance {
    Balance {
        id,
        time,
        base_balance: dec!(1000),
        quote_balance: dec!(50),
        base_buy_potential: dec!(10),
        quote_buy_potential: dec!(2.5),
        base_sell_potential: dec!(8),
        quote_sell_potential: dec!(2.1),
    }
}

fn pipeline(
    store: FakeStore,
    sink: Arc<SpySink>,
) -> RunSyncUseCase<FakeStore, SpySink, SheetCursorProvider<SpySink>> {
    let cursors = Arc::new(SheetCursorProvider::new(Arc::clone(&sink)));
    RunSyncUseCase::new(Arc::new(store), sink, cursors)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn a_second_run_with_no_new_events_appends_nothing() {
    let store = FakeStore {
        orders: vec![fulfilled_order(1), pending_order(2), fulfilled_order(3)],
        fragments: vec![fragment(10, 1), fragment(11, 3)],
        balances: vec![balance(1, 2_000)],
        launch_times: vec![500, 1_500],
    };
    let sink = Arc::new(SpySink::default());
    let run = pipeline(store, Arc::clone(&sink));

    let first = run.execute().await.unwrap();
    assert_eq!(first.orders_rows, 2);
    assert_eq!(first.fragments_rows, 2);
    assert_eq!(first.balances_rows, 1);
    let appends_after_first = sink.append_calls();

    let second = run.execute().await.unwrap();
    assert!(second.is_empty());
    assert_eq!(sink.append_calls(), appends_after_first);
}

#[tokio::test]
async fn orders_resume_from_the_sheets_trailing_id() {
    let store = FakeStore {
        orders: (4..=9).map(fulfilled_order).collect(),
        ..FakeStore::default()
    };
    let sink = Arc::new(SpySink::default());
    sink.seed("Orders", &[&["id"], &["5"], &["6"], &["7"]]);

    let report = pipeline(store, Arc::clone(&sink)).execute().await.unwrap();

    assert_eq!(report.orders_rows, 2);
    let ids = sink.column("Orders", 0);
    assert_eq!(ids, vec!["id", "5", "6", "7", "8", "9"]);

    // Appends land right after the existing rows, and each row's formulas
    // reference its own landing position.
    let appended = &sink.rows("Orders")[4];
    assert_eq!(appended[1], "=EPOCHTODATE(L5, 2)");
}

#[tokio::test]
async fn fragments_stay_within_the_fulfilled_order_window() {
    let store = FakeStore {
        orders: vec![fulfilled_order(6), fulfilled_order(7), pending_order(8)],
        fragments: vec![fragment(20, 6), fragment(21, 7), fragment(22, 8)],
        ..FakeStore::default()
    };
    let sink = Arc::new(SpySink::default());
    sink.seed("Orders", &[&["5"]]);
    sink.seed("Fragments", &[&["20", "DOGE", "BUSD", "1", "1", "Buy", "4", "5"]]);

    let report = pipeline(store, Arc::clone(&sink)).execute().await.unwrap();

    // Order 8 is not fulfilled, so its fragment stays out of the window.
    assert_eq!(report.fragments_rows, 2);
    assert_eq!(sink.column("Fragments", 7), vec!["5", "6", "7"]);
}

#[tokio::test]
async fn launch_counts_cover_half_open_windows_between_snapshots() {
    let store = FakeStore {
        balances: vec![balance(2, 200), balance(3, 350)],
        launch_times: vec![120, 150, 210, 340],
        ..FakeStore::default()
    };
    let sink = Arc::new(SpySink::default());
    sink.seed("Balances", &[&["1", "date", "100"]]);

    let report = pipeline(store, Arc::clone(&sink)).execute().await.unwrap();

    assert_eq!(report.balances_rows, 2);
    // (100, 200] holds launches 120 and 150; (200, 350] holds 210 and 340.
    assert_eq!(sink.column("Balances", 9), vec!["2", "2"]);
    assert_eq!(sink.column("Balances", 2), vec!["100", "200", "350"]);
}

#[tokio::test]
async fn a_non_numeric_trailing_cell_falls_back_to_a_full_sync() {
    let store = FakeStore {
        orders: vec![fulfilled_order(1), fulfilled_order(2)],
        ..FakeStore::default()
    };
    let sink = Arc::new(SpySink::default());
    sink.seed("Orders", &[&["id"]]);

    let report = pipeline(store, Arc::clone(&sink)).execute().await.unwrap();

    assert_eq!(report.orders_rows, 2);
    assert_eq!(sink.column("Orders", 0), vec!["id", "1", "2"]);
}

/// Sink whose every call fails, as an unreachable spreadsheet would.
struct DownSink;

#[async_trait]
impl TableSinkPort for DownSink {
    async fn read(&self, _range: &str) -> Result<Vec<Vec<String>>, SinkError> {
        Err(SinkError::Unavailable("connection refused".to_string()))
    }

    async fn append(&self, _destination: &str, _rows: &[SheetRow]) -> Result<u64, SinkError> {
        Err(SinkError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn an_unreachable_sink_names_the_stream_that_aborted_the_run() {
    let sink = Arc::new(DownSink);
    let cursors = Arc::new(SheetCursorProvider::new(Arc::clone(&sink)));
    let run = RunSyncUseCase::new(Arc::new(FakeStore::default()), sink, cursors);

    let err = run.execute().await.unwrap_err();
    // Orders sync goes first, so its cursor resolution is what fails.
    assert_eq!(err.stream(), Stream::Orders);
}

#[tokio::test]
async fn an_empty_store_never_touches_the_sink() {
    let sink = Arc::new(SpySink::default());

    let report = pipeline(FakeStore::default(), Arc::clone(&sink))
        .execute()
        .await
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.cells_written, 0);
    assert_eq!(sink.append_calls(), 0);
}
