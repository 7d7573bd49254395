//! Fragment entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// A fragment of an order.
///
/// Fragments have no sync identity of their own; they are visible to the
/// engine only through the order that composed them (`composed_order`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Store-assigned identity.
    pub id: i64,
    /// Base asset.
    pub base: String,
    /// Quote asset.
    pub quote: String,
    /// Quantity of base in this fragment.
    pub amount: Decimal,
    /// Rate the fragment targets.
    pub target_rate: Decimal,
    /// Buy or sell.
    pub side: Side,
    /// Order whose fulfillment spawned this fragment.
    pub spawning_order: i64,
    /// Order this fragment composes (foreign key to `Order::id`).
    pub composed_order: i64,
}
