//! Session Port (Driven Port)
//!
//! Interface to the table store: a provider hands out authenticated sessions,
//! a session executes parameterized statements and streams whole tables.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ColumnSpec, Row, TypedValue};

/// Errors raised by the table store or while reaching it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store did not become ready within the readiness budget.
    #[error("store not ready after {attempts} attempt(s) of {timeout:?}: {last_error}")]
    NotReady {
        /// Attempts made.
        attempts: u32,
        /// Per-attempt readiness timeout.
        timeout: Duration,
        /// Failure reported by the last attempt.
        last_error: String,
    },

    /// Opening or acquiring a connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Credentials could not be resolved.
    #[error("credentials unavailable: {0}")]
    Credentials(String),

    /// A statement failed to execute.
    #[error("query failed: {0}")]
    Query(String),

    /// A placeholder in the statement text has no bound value.
    #[error("statement placeholder '${0}' is not bound")]
    UnboundParameter(String),

    /// A bound value cannot be represented by the store.
    #[error("cannot encode parameter '{name}': {message}")]
    Encode {
        /// Parameter name.
        name: String,
        /// Reason.
        message: String,
    },

    /// A column value cannot be decoded into its declared type.
    #[error("cannot decode column '{column}': {message}")]
    Decode {
        /// Column name.
        column: String,
        /// Reason.
        message: String,
    },
}

impl StoreError {
    /// Connection failure from any displayable error.
    pub fn connection(err: impl std::fmt::Display) -> Self {
        Self::Connection(err.to_string())
    }

    /// Query failure from any displayable error.
    pub fn query(err: impl std::fmt::Display) -> Self {
        Self::Query(err.to_string())
    }

    /// Encode failure for parameter `name`.
    pub fn encode(name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            name: name.into(),
            message: err.to_string(),
        }
    }

    /// Decode failure for column `column`.
    pub fn decode(column: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            column: column.into(),
            message: err.to_string(),
        }
    }
}

/// A statement template with named `$placeholders` and typed bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    params: Vec<(String, TypedValue)>,
    returning: Vec<ColumnSpec>,
}

impl Statement {
    /// Create a statement from its text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Bind a value to a named placeholder. The leading `$` is optional.
    #[must_use]
    pub fn bind(mut self, name: &str, value: TypedValue) -> Self {
        let name = name.trim_start_matches('$').to_string();
        if let Some(slot) = self.params.iter_mut().find(|(bound, _)| *bound == name) {
            slot.1 = value;
        } else {
            self.params.push((name, value));
        }
        self
    }

    /// Declare the columns the statement returns.
    #[must_use]
    pub fn returning(mut self, columns: &[ColumnSpec]) -> Self {
        self.returning = columns.to_vec();
        self
    }

    /// Statement text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound parameters in binding order.
    #[must_use]
    pub fn params(&self) -> &[(String, TypedValue)] {
        &self.params
    }

    /// Value bound to `name`, without the leading `$`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&TypedValue> {
        self.params
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Columns the statement returns.
    #[must_use]
    pub fn returning_columns(&self) -> &[ColumnSpec] {
        &self.returning
    }
}

/// Outcome of executing a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: Vec<Row>,
    rows_affected: u64,
}

impl ResultSet {
    /// Create a result set.
    #[must_use]
    pub const fn new(rows: Vec<Row>, rows_affected: u64) -> Self {
        Self {
            rows,
            rows_affected,
        }
    }

    /// Result of a statement that returned rows; every row counts as affected.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let rows_affected = u64::try_from(rows.len()).unwrap_or(u64::MAX);
        Self::new(rows, rows_affected)
    }

    /// Returned rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take ownership of the returned rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Number of rows the statement touched.
    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

/// An authenticated, ready connection to the table store.
#[async_trait]
pub trait Session: Send {
    /// Execute a parameterized statement.
    async fn execute(&mut self, statement: &Statement) -> Result<ResultSet, StoreError>;

    /// Read every row of `table`, decoding `columns`, in store order.
    async fn stream_read_table(
        &mut self,
        table: &str,
        columns: &[ColumnSpec],
    ) -> Result<Vec<Row>, StoreError>;

    /// Release the session.
    async fn close(self) -> Result<(), StoreError>;
}

/// Source of sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Session type handed out by this provider.
    type Session: Session + 'static;

    /// Acquire a ready session.
    async fn acquire(&self) -> Result<Self::Session, StoreError>;

    /// Tear down the driver and every pooled connection.
    async fn shutdown(&self);
}
