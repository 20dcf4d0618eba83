//! Typed column values.
//!
//! The table store checks parameter and column types on its side, so every
//! value crossing the session port carries an explicit column type.

use std::fmt;

use chrono::{DateTime, Utc};

/// Column types understood by the session port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Unsigned 64-bit integer.
    Uint64,
    /// UTF-8 text.
    Utf8,
    /// UTC timestamp.
    Timestamp,
}

impl ColumnType {
    /// Name of the type as used in log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uint64 => "Uint64",
            Self::Utf8 => "Utf8",
            Self::Timestamp => "Timestamp",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tagged with its column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// Unsigned 64-bit integer.
    Uint64(u64),
    /// UTF-8 text.
    Utf8(String),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl TypedValue {
    /// Build a `Uint64` value.
    #[must_use]
    pub const fn uint64(value: u64) -> Self {
        Self::Uint64(value)
    }

    /// Build a `Utf8` value.
    #[must_use]
    pub fn utf8(value: impl Into<String>) -> Self {
        Self::Utf8(value.into())
    }

    /// Build a `Timestamp` value.
    #[must_use]
    pub const fn timestamp(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }

    /// The column type of this value.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Uint64(_) => ColumnType::Uint64,
            Self::Utf8(_) => ColumnType::Utf8,
            Self::Timestamp(_) => ColumnType::Timestamp,
        }
    }

    /// Get the integer if this is a `Uint64`.
    #[must_use]
    pub const fn as_uint64(&self) -> Option<u64> {
        match self {
            Self::Uint64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text if this is a `Utf8`.
    #[must_use]
    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            Self::Utf8(v) => Some(v),
            _ => None,
        }
    }

    /// Get the timestamp if this is a `Timestamp`.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

/// Name and type of a column to read back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// Declared type.
    pub ty: ColumnType,
}

impl ColumnSpec {
    /// Create a column descriptor.
    #[must_use]
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// One decoded row, columns in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(&'static str, TypedValue)>,
}

impl Row {
    /// Create an empty row with room for `capacity` columns.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Append a column value.
    pub fn push(&mut self, name: &'static str, value: TypedValue) {
        self.columns.push((name, value));
    }

    /// Append a column value, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: TypedValue) -> Self {
        self.push(name, value);
        self
    }

    /// Look up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
