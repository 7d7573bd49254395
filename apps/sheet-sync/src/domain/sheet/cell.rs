//! Cell values appended to the sink.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use super::Formula;

/// One appended row: an ordered sequence of cell values.
pub type SheetRow = Vec<CellValue>;

/// A single cell of an appended row.
///
/// Formulas are a distinct variant, never folded into `Text`: the engine
/// must be able to tell deferred sink-evaluated expressions apart from
/// plain data it computed itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Integer data (ids, timestamps, counts).
    Integer(i64),
    /// Decimal data (quantities, rates).
    Number(Decimal),
    /// Text data (assets, sides).
    Text(String),
    /// An expression evaluated by the sink.
    Formula(Formula),
}

impl CellValue {
    /// Text form of the cell as the sink will receive it.
    ///
    /// Decimals are sent as strings and formulas as `=`-prefixed strings;
    /// the sink parses both under user-entered input semantics.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Number(d) => d.to_string(),
            Self::Text(s) => s.clone(),
            Self::Formula(f) => f.as_str().to_string(),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Number(d) => serializer.serialize_str(&d.to_string()),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Formula(f) => serializer.serialize_str(f.as_str()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Formula> for CellValue {
    fn from(value: Formula) -> Self {
        Self::Formula(value)
    }
}
