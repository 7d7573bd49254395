//! SQLite event store implementing `EventStorePort` on turso.
//!
//! The trading bot owns the schema; this adapter only reads it. Column
//! order in the SELECTs is fixed and mirrored by the row mappers below.

use std::path::Path;

use async_trait::async_trait;
use rust_decimal::Decimal;
use turso::{Builder, Connection, Row, Rows, Value};

use crate::application::ports::{EventStorePort, StoreError};
use crate::domain::model::{Balance, EpochMillis, Fragment, Order, OrderStatus, Side};

const ORDER_COLUMNS: &str = "id, base, quote, side, quantity, loan, fragments_rate, \
     execution_rate, status, activation_time, fulfill_time, taken_home, exchange_id";

const FRAGMENT_COLUMNS: &str =
    "f.id, f.base, f.quote, f.amount, f.target_rate, f.side, f.spawning_order, f.composed_order";

const BALANCE_COLUMNS: &str = "id, time, base_balance, quote_balance, base_buy_potential, \
     quote_buy_potential, base_sell_potential, quote_sell_potential";

/// Read-only access to the trading bot's SQLite event log.
pub struct SqliteEventStore {
    conn: Connection,
}

impl SqliteEventStore {
    /// Open an existing database file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the file does not exist or
    /// cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Unavailable(format!(
                "database file not found: {}",
                path.display()
            )));
        }
        Self::connect(&path.to_string_lossy()).await
    }

    /// Open a fresh in-memory database. Used by tests and tooling.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the database cannot be created.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::connect(":memory:").await
    }

    async fn connect(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }

}

async fn collect_orders(mut rows: Rows) -> Result<Vec<Order>, StoreError> {
    let mut orders = Vec::new();
    while let Some(row) = rows.next().await.map_err(query_error)? {
        orders.push(order_from_row(&row)?);
    }
    Ok(orders)
}

#[async_trait]
impl EventStorePort for SqliteEventStore {
    async fn orders_in_range(
        &self,
        previous_id: i64,
        last_id: Option<i64>,
    ) -> Result<Vec<Order>, StoreError> {
        let fulfilled = OrderStatus::Fulfilled.as_i64();
        let rows = match last_id {
            Some(last) => {
                let sql = format!(
                    "SELECT {ORDER_COLUMNS} FROM Orders \
                     WHERE status = ? AND id > ? AND id <= ? ORDER BY id ASC"
                );
                self.conn
                    .query(&sql, [fulfilled, previous_id, last])
                    .await
                    .map_err(query_error)?
            }
            None => {
                let sql = format!(
                    "SELECT {ORDER_COLUMNS} FROM Orders \
                     WHERE status = ? AND id > ? ORDER BY id ASC"
                );
                self.conn
                    .query(&sql, [fulfilled, previous_id])
                    .await
                    .map_err(query_error)?
            }
        };
        collect_orders(rows).await
    }

    async fn fragments_in_range(
        &self,
        previous_order_id: i64,
        last_order_id: i64,
    ) -> Result<Vec<Fragment>, StoreError> {
        let sql = format!(
            "SELECT {FRAGMENT_COLUMNS} FROM Fragments f \
             INNER JOIN Orders o ON f.composed_order = o.id \
             WHERE o.status = ? AND o.id > ? AND o.id <= ? \
             ORDER BY f.id ASC"
        );
        let mut rows = self
            .conn
            .query(
                &sql,
                [
                    OrderStatus::Fulfilled.as_i64(),
                    previous_order_id,
                    last_order_id,
                ],
            )
            .await
            .map_err(query_error)?;

        let mut fragments = Vec::new();
        while let Some(row) = rows.next().await.map_err(query_error)? {
            fragments.push(fragment_from_row(&row)?);
        }
        Ok(fragments)
    }

    async fn balances_after(&self, previous_time: EpochMillis) -> Result<Vec<Balance>, StoreError> {
        let sql =
            format!("SELECT {BALANCE_COLUMNS} FROM Balances WHERE time > ? ORDER BY time ASC");
        let mut rows = self
            .conn
            .query(&sql, [previous_time])
            .await
            .map_err(query_error)?;

        let mut balances = Vec::new();
        while let Some(row) = rows.next().await.map_err(query_error)? {
            balances.push(balance_from_row(&row)?);
        }
        Ok(balances)
    }

    async fn count_launches_between(
        &self,
        previous_time: EpochMillis,
        time: EpochMillis,
    ) -> Result<i64, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM Launches WHERE time > ? AND time <= ?",
                [previous_time, time],
            )
            .await
            .map_err(query_error)?;

        match rows.next().await.map_err(query_error)? {
            Some(row) => integer_at(&row, 0, "count"),
            None => Err(StoreError::Query(
                "launch count query returned no rows".to_string(),
            )),
        }
    }
}

fn query_error(e: turso::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn order_from_row(row: &Row) -> Result<Order, StoreError> {
    Ok(Order {
        id: integer_at(row, 0, "id")?,
        base: text_at(row, 1, "base")?,
        quote: text_at(row, 2, "quote")?,
        side: side_at(row, 3)?,
        quantity: decimal_at(row, 4, "quantity")?,
        loan: decimal_at(row, 5, "loan")?,
        fragments_rate: decimal_at(row, 6, "fragments_rate")?,
        execution_rate: decimal_at(row, 7, "execution_rate")?,
        status: status_at(row, 8)?,
        activation_time: integer_at(row, 9, "activation_time")?,
        fulfill_time: integer_at(row, 10, "fulfill_time")?,
        taken_home: decimal_at(row, 11, "taken_home")?,
        exchange_id: integer_at(row, 12, "exchange_id")?,
    })
}

fn fragment_from_row(row: &Row) -> Result<Fragment, StoreError> {
    Ok(Fragment {
        id: integer_at(row, 0, "id")?,
        base: text_at(row, 1, "base")?,
        quote: text_at(row, 2, "quote")?,
        amount: decimal_at(row, 3, "amount")?,
        target_rate: decimal_at(row, 4, "target_rate")?,
        side: side_at(row, 5)?,
        spawning_order: integer_at(row, 6, "spawning_order")?,
        composed_order: integer_at(row, 7, "composed_order")?,
    })
}

fn balance_from_row(row: &Row) -> Result<Balance, StoreError> {
    Ok(Balance {
        id: integer_at(row, 0, "id")?,
        time: integer_at(row, 1, "time")?,
        base_balance: decimal_at(row, 2, "base_balance")?,
        quote_balance: decimal_at(row, 3, "quote_balance")?,
        base_buy_potential: decimal_at(row, 4, "base_buy_potential")?,
        quote_buy_potential: decimal_at(row, 5, "quote_buy_potential")?,
        base_sell_potential: decimal_at(row, 6, "base_sell_potential")?,
        quote_sell_potential: decimal_at(row, 7, "quote_sell_potential")?,
    })
}

fn value_at(row: &Row, idx: usize, column: &str) -> Result<Value, StoreError> {
    row.get_value(idx)
        .map_err(|e| StoreError::Query(format!("column {column}: {e}")))
}

fn integer_at(row: &Row, idx: usize, column: &str) -> Result<i64, StoreError> {
    match value_at(row, idx, column)? {
        Value::Integer(v) => Ok(v),
        other => Err(StoreError::Query(format!(
            "column {column}: expected integer, got {other:?}"
        ))),
    }
}

fn text_at(row: &Row, idx: usize, column: &str) -> Result<String, StoreError> {
    match value_at(row, idx, column)? {
        Value::Text(s) => Ok(s),
        other => Err(StoreError::Query(format!(
            "column {column}: expected text, got {other:?}"
        ))),
    }
}

/// Decimal columns are stored as text by the bot's ORM, but tolerate
/// integer and real affinity for hand-written rows.
fn decimal_at(row: &Row, idx: usize, column: &str) -> Result<Decimal, StoreError> {
    let parse_failure =
        |value: &dyn std::fmt::Debug| StoreError::Query(format!("column {column}: {value:?} is not a decimal"));
    match value_at(row, idx, column)? {
        Value::Text(s) => s.parse::<Decimal>().map_err(|_| parse_failure(&s)),
        Value::Integer(v) => Ok(Decimal::from(v)),
        Value::Real(f) => Decimal::try_from(f).map_err(|_| parse_failure(&f)),
        other => Err(parse_failure(&other)),
    }
}

fn side_at(row: &Row, idx: usize) -> Result<Side, StoreError> {
    let text = text_at(row, idx, "side")?;
    Side::parse(&text).ok_or_else(|| StoreError::Query(format!("unknown side value: {text}")))
}

fn status_at(row: &Row, idx: usize) -> Result<OrderStatus, StoreError> {
    let value = integer_at(row, idx, "status")?;
    OrderStatus::from_i64(value)
        .ok_or_else(|| StoreError::Query(format!("unknown order status value: {value}")))
}
