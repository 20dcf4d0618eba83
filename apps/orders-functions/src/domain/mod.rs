//! Domain Layer - Order record and typed column values.
//!
//! Pure types with no I/O. Validation of untrusted payloads and the mapping
//! between orders and typed store columns live here.

/// Validation errors.
pub mod errors;

/// Order record type and identifiers.
pub mod order;

/// Typed values, column descriptors and rows.
pub mod typed_value;

pub use errors::ValidationError;
pub use order::{IdPolicy, ORDERS_TABLE, Order, OrderId};
pub use typed_value::{ColumnSpec, ColumnType, Row, TypedValue};
