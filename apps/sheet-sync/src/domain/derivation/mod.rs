//! Derived sink rows.
//!
//! Each function maps one store entity to the row appended to its sheet.
//! Order rows carry symbolic formulas the sink evaluates itself; balance
//! rows carry one locally computed value, the launch count for the window
//! ending at the snapshot. Fragments pass through unchanged.
//!
//! Sink column layout produced here:
//!
//! ```text
//! Orders:    A id | B fulfill date | C base | D quote | E side | F quantity
//!            G loan | H fragments_rate | I execution_rate | J status
//!            K activation_time | L fulfill_time | M taken_home
//!            N exchange_id | O taken-home total | P price per unit
//!            Q net quantity
//! Fragments: A id | B base | C quote | D amount | E target_rate | F side
//!            G spawning_order | H composed_order
//! Balances:  A id | B date | C time | D..I balance columns | J launches
//! ```

use crate::domain::model::{Balance, Fragment, Order};
use crate::domain::sheet::{CellValue, FormulaTemplate, SheetRow};

/// Human-readable fulfill time, from the epoch-ms value in column L.
const ORDER_FULFILL_DATE: FormulaTemplate = FormulaTemplate::new("EPOCHTODATE(L{row}, 2)");

/// Total quantity taken home, summed over this order's fragments on the
/// fragment sheet (composed_order in H, amount in D).
const ORDER_TAKEN_HOME_TOTAL: FormulaTemplate =
    FormulaTemplate::new("SUMIF(Fragments!$H:$H, $A{row}, Fragments!$D:$D)");

/// Effective price per unit; the divisor excludes the loan when one exists.
const ORDER_PRICE_PER_UNIT: FormulaTemplate =
    FormulaTemplate::new("IF($G{row}=0, $M{row}/$F{row}, $M{row}/($F{row}-$G{row}))");

/// Loan-adjusted quantity scaled by the fulfilled fraction.
const ORDER_NET_QUANTITY: FormulaTemplate =
    FormulaTemplate::new("($F{row}-$G{row})*$O{row}/$F{row}");

/// Human-readable snapshot time, from the epoch-ms value in column C.
const BALANCE_DATE: FormulaTemplate = FormulaTemplate::new("EPOCHTODATE(C{row}, 2)");

/// Build the sink row for a fulfilled order.
///
/// `sheet_row` is the 1-based row the append will land on; the formulas
/// reference cells of that row, so it must match the sink's current length.
#[must_use]
pub fn order_sheet_row(order: &Order, sheet_row: u32) -> SheetRow {
    vec![
        CellValue::Integer(order.id),
        ORDER_FULFILL_DATE.render(sheet_row).into(),
        order.base.as_str().into(),
        order.quote.as_str().into(),
        order.side.as_str().into(),
        CellValue::Number(order.quantity),
        CellValue::Number(order.loan),
        CellValue::Number(order.fragments_rate),
        CellValue::Number(order.execution_rate),
        CellValue::Integer(order.status.as_i64()),
        CellValue::Integer(order.activation_time),
        CellValue::Integer(order.fulfill_time),
        CellValue::Number(order.taken_home),
        CellValue::Integer(order.exchange_id),
        ORDER_TAKEN_HOME_TOTAL.render(sheet_row).into(),
        ORDER_PRICE_PER_UNIT.render(sheet_row).into(),
        ORDER_NET_QUANTITY.render(sheet_row).into(),
    ]
}

/// Build the sink row for a fragment. Pure passthrough, no derivation.
#[must_use]
pub fn fragment_sheet_row(fragment: &Fragment) -> SheetRow {
    vec![
        CellValue::Integer(fragment.id),
        fragment.base.as_str().into(),
        fragment.quote.as_str().into(),
        CellValue::Number(fragment.amount),
        CellValue::Number(fragment.target_rate),
        fragment.side.as_str().into(),
        CellValue::Integer(fragment.spawning_order),
        CellValue::Integer(fragment.composed_order),
    ]
}

/// Build the sink row for a balance snapshot.
///
/// `launches` is the locally computed count of launch events in the
/// half-open window ending at this snapshot's time; the caller owns the
/// running previous-time cursor that defines the window's lower bound.
#[must_use]
pub fn balance_sheet_row(balance: &Balance, launches: i64, sheet_row: u32) -> SheetRow {
    vec![
        CellValue::Integer(balance.id),
        BALANCE_DATE.render(sheet_row).into(),
        CellValue::Integer(balance.time),
        CellValue::Number(balance.base_balance),
        CellValue::Number(balance.quote_balance),
        CellValue::Number(balance.base_buy_potential),
        CellValue::Number(balance.quote_buy_potential),
        CellValue::Number(balance.base_sell_potential),
        CellValue::Number(balance.quote_sell_potential),
        CellValue::Integer(launches),
    ]
}
