//! Order entity and its enumerations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::EpochMillis;

/// Order lifecycle status as stored by the trading bot.
///
/// Stored as an integer column; only `Fulfilled` orders are eligible for
/// synchronization, and a fulfilled order is immutable from the engine's
/// point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Being submitted to the exchange.
    Sending,
    /// Cancellation requested.
    Cancelling,
    /// Known locally, not active on the exchange.
    Inactive,
    /// Active on the exchange.
    Active,
    /// Completely executed; terminal.
    Fulfilled,
}

impl OrderStatus {
    /// Integer representation used by the store's status column.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Sending => 0,
            Self::Cancelling => 1,
            Self::Inactive => 2,
            Self::Active => 3,
            Self::Fulfilled => 4,
        }
    }

    /// Parse the store's integer representation.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Sending),
            1 => Some(Self::Cancelling),
            2 => Some(Self::Inactive),
            3 => Some(Self::Active),
            4 => Some(Self::Fulfilled),
            _ => None,
        }
    }

    /// Returns true if the order has reached its terminal, syncable state.
    #[must_use]
    pub const fn is_fulfilled(self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sending => "Sending",
            Self::Cancelling => "Cancelling",
            Self::Inactive => "Inactive",
            Self::Active => "Active",
            Self::Fulfilled => "Fulfilled",
        };
        write!(f, "{name}")
    }
}

/// Side of an order or fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buying the base asset.
    Buy,
    /// Selling the base asset.
    Sell,
}

impl Side {
    /// Text representation used by the store's side column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    /// Parse the store's text representation (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Buy" | "buy" => Some(Self::Buy),
            "Sell" | "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An order placed by the trading bot.
///
/// `id` is assigned by the bot's store and is strictly increasing, which is
/// what makes the trailing sink id usable as a watermark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned identity, strictly increasing.
    pub id: i64,
    /// Base asset.
    pub base: String,
    /// Quote asset.
    pub quote: String,
    /// Buy or sell.
    pub side: Side,
    /// Quantity of base exchanged.
    pub quantity: Decimal,
    /// Borrowed portion of the quantity, zero when unleveraged.
    pub loan: Decimal,
    /// Rate at which fragments were spawned.
    pub fragments_rate: Decimal,
    /// Rate at which the order executed.
    pub execution_rate: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order became active.
    pub activation_time: EpochMillis,
    /// When the order was completely executed.
    pub fulfill_time: EpochMillis,
    /// Quote amount kept after the trade.
    pub taken_home: Decimal,
    /// Identifier assigned by the exchange.
    pub exchange_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_integer_roundtrip() {
        for status in [
            OrderStatus::Sending,
            OrderStatus::Cancelling,
            OrderStatus::Inactive,
            OrderStatus::Active,
            OrderStatus::Fulfilled,
        ] {
            assert_eq!(OrderStatus::from_i64(status.as_i64()), Some(status));
        }
    }

    #[test]
    fn status_rejects_unknown_integer() {
        assert_eq!(OrderStatus::from_i64(5), None);
        assert_eq!(OrderStatus::from_i64(-1), None);
    }

    #[test]
    fn only_fulfilled_is_terminal() {
        assert!(OrderStatus::Fulfilled.is_fulfilled());
        assert!(!OrderStatus::Active.is_fulfilled());
        assert!(!OrderStatus::Sending.is_fulfilled());
    }

    #[test]
    fn side_parses_both_cases() {
        assert_eq!(Side::parse("Buy"), Some(Side::Buy));
        assert_eq!(Side::parse("sell"), Some(Side::Sell));
        assert_eq!(Side::parse("hold"), None);
    }
}
