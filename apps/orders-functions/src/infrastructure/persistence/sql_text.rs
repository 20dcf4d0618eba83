//! Statement text handling.
//!
//! Statements carry named `$placeholders`; drivers bind positionally. This
//! module rewrites the names into the driver's positional form and orders
//! the bound values to match.

use std::sync::OnceLock;

use regex::Regex;

use crate::application::ports::{Statement, StoreError};
use crate::domain::{ColumnSpec, TypedValue};

/// Positional placeholder syntax of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (Postgres)
    Dollar,
    /// `?1`, `?2`, ... (SQLite)
    Question,
}

impl PlaceholderStyle {
    fn render(self, index: usize) -> String {
        match self {
            Self::Dollar => format!("${index}"),
            Self::Question => format!("?{index}"),
        }
    }
}

/// Statement text in positional form with its values in bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSql {
    /// Rewritten text.
    pub sql: String,
    /// Values in placeholder order.
    pub values: Vec<(String, TypedValue)>,
}

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder regex is valid")
    })
}

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"))
}

/// Rewrite named placeholders into `style`.
///
/// Repeated names share one position. Every placeholder must be bound;
/// bindings with no placeholder are ignored.
pub fn to_positional(
    statement: &Statement,
    style: PlaceholderStyle,
) -> Result<PositionalSql, StoreError> {
    let text = statement.text();
    let mut sql = String::with_capacity(text.len());
    let mut values: Vec<(String, TypedValue)> = Vec::new();
    let mut last = 0;

    for captures in placeholder_pattern().captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let name = name.as_str();

        let index = if let Some(existing) = values.iter().position(|(n, _)| n == name) {
            existing + 1
        } else {
            let value = statement
                .param(name)
                .ok_or_else(|| StoreError::UnboundParameter(name.to_string()))?;
            values.push((name.to_string(), value.clone()));
            values.len()
        };

        sql.push_str(&text[last..whole.start()]);
        sql.push_str(&style.render(index));
        last = whole.end();
    }
    sql.push_str(&text[last..]);

    Ok(PositionalSql { sql, values })
}

/// Check that `name` is a plain SQL identifier.
pub fn validate_identifier(name: &str) -> Result<&str, StoreError> {
    if identifier_pattern().is_match(name) {
        Ok(name)
    } else {
        Err(StoreError::query(format!("invalid identifier '{name}'")))
    }
}

/// `SELECT` of `columns` from `table`, in key order (first column).
pub fn select_all(table: &str, columns: &[ColumnSpec]) -> Result<String, StoreError> {
    let table = validate_identifier(table)?;
    let names = columns
        .iter()
        .map(|c| validate_identifier(c.name))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(key) = names.first() else {
        return Err(StoreError::query("table read needs at least one column"));
    };
    Ok(format!(
        "SELECT {} FROM {table} ORDER BY {key}",
        names.join(", ")
    ))
}
