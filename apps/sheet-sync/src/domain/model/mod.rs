//! Entities read from the trading event log.
//!
//! These mirror the store's column layout exactly; the engine never mutates
//! them, it only derives sink rows from them.

mod balance;
mod fragment;
mod order;

pub use balance::Balance;
pub use fragment::Fragment;
pub use order::{Order, OrderStatus, Side};

/// Milliseconds since the Unix epoch, as stored by the trading bot.
pub type EpochMillis = i64;
