//! Symbolic formulas and row-position templates.

use std::fmt;

/// A rendered sink formula, including the leading `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula(String);

impl Formula {
    /// Wrap a formula body (without the leading `=`).
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self(format!("={}", body.into()))
    }

    /// The full formula text as the sink expects it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A formula body with `{row}` placeholders for the sink row it will land on.
///
/// Appended formulas reference cells of their own row (and fixed columns of
/// other sheets), so the row number is the only late-bound part. Rendering
/// is separated from the templates themselves so a different sink dialect
/// only has to swap the template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTemplate(&'static str);

impl FormulaTemplate {
    /// Wrap a template body.
    #[must_use]
    pub const fn new(body: &'static str) -> Self {
        Self(body)
    }

    /// Render the template for a concrete 1-based sink row.
    #[must_use]
    pub fn render(&self, row: u32) -> Formula {
        Formula::new(self.0.replace("{row}", &row.to_string()))
    }
}
