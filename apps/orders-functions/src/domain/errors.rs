//! Domain errors for order records.

use thiserror::Error;

use super::typed_value::ColumnType;

/// Errors raised while building an [`Order`](super::order::Order) from
/// untrusted input or from a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload is not a JSON object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// The request carries no body.
    #[error("request body is required")]
    MissingBody,

    /// The payload could not be parsed as JSON.
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    /// A required field is absent or null.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field has the wrong JSON type.
    #[error("field '{field}' must be {expected}")]
    WrongType {
        /// Field name.
        field: &'static str,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },

    /// The order name is empty or whitespace.
    #[error("field 'name' must not be empty")]
    EmptyName,

    /// The timestamp could not be parsed.
    #[error("field 'createdAt' is not a valid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The identifier is not a positive 64-bit integer.
    #[error("invalid order id '{0}': expected a positive integer")]
    InvalidId(String),

    /// A stored column carried an unexpected type.
    #[error("column '{column}' expected {expected}")]
    ColumnType {
        /// Column name.
        column: &'static str,
        /// Declared type.
        expected: ColumnType,
    },
}
