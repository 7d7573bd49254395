//! Balance snapshot entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EpochMillis;

/// A point-in-time snapshot of the bot's funds and open potential.
///
/// `time` is strictly increasing across rows as read from the store, which
/// the balance sync relies on for its running launch-count cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Store-assigned identity.
    pub id: i64,
    /// Snapshot time.
    pub time: EpochMillis,
    /// Base asset funds.
    pub base_balance: Decimal,
    /// Quote asset funds.
    pub quote_balance: Decimal,
    /// Base that outstanding buy fragments would add.
    pub base_buy_potential: Decimal,
    /// Quote that buying all of the above would cost.
    pub quote_buy_potential: Decimal,
    /// Base that outstanding sell fragments would remove.
    pub base_sell_potential: Decimal,
    /// Quote that selling all of the above would yield.
    pub quote_sell_potential: Decimal,
}
