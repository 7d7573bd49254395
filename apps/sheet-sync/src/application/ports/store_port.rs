//! Event Store Port (Driven)
//!
//! Read-only range queries over the trading bot's event log. All sequences
//! come back ordered ascending by id or time, matching insertion order.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::model::{Balance, EpochMillis, Fragment, Order};

/// Errors from the event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached or opened. Fatal for the run.
    #[error("event store unavailable: {0}")]
    Unavailable(String),

    /// A query failed or returned rows the engine cannot interpret.
    #[error("event store query failed: {0}")]
    Query(String),
}

/// Range queries over the event log.
#[async_trait]
pub trait EventStorePort: Send + Sync {
    /// Fulfilled orders with `id > previous_id`, and `id <= last_id` when an
    /// upper bound is given. Ascending by id.
    async fn orders_in_range(
        &self,
        previous_id: i64,
        last_id: Option<i64>,
    ) -> Result<Vec<Order>, StoreError>;

    /// Fragments whose composing order is fulfilled and has
    /// `id in (previous_order_id, last_order_id]`. Ascending by fragment id.
    async fn fragments_in_range(
        &self,
        previous_order_id: i64,
        last_order_id: i64,
    ) -> Result<Vec<Fragment>, StoreError>;

    /// Balance snapshots with `time > previous_time`, ascending by time.
    async fn balances_after(&self, previous_time: EpochMillis) -> Result<Vec<Balance>, StoreError>;

    /// Count of launch events in the half-open interval `(previous_time, time]`.
    async fn count_launches_between(
        &self,
        previous_time: EpochMillis,
        time: EpochMillis,
    ) -> Result<i64, StoreError>;
}
