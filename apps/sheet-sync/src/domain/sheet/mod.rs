//! Sink-side value model.
//!
//! The sink is an append-only spreadsheet: a row is an ordered sequence of
//! cells, and a cell is either plain data or a formula the sink evaluates
//! itself. Formulas are kept symbolic so the spreadsheet stays the single
//! source of truth for derived financial math.

mod cell;
mod formula;

pub use cell::{CellValue, SheetRow};
pub use formula::{Formula, FormulaTemplate};

/// Destination sheet for order rows.
pub const ORDERS_SHEET: &str = "Orders";

/// Destination sheet for fragment rows.
pub const FRAGMENTS_SHEET: &str = "Fragments";

/// Destination sheet for balance rows.
pub const BALANCES_SHEET: &str = "Balances";
