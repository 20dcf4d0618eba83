//! Persistence Adapters
//!
//! SQL implementations of the session port.

pub mod postgres;
pub mod query;
pub mod readiness;
pub mod sql_text;
pub mod sqlite;

mod sql;

pub use query::SqlDriver;
pub use readiness::{BackoffPolicy, ReadinessConfig, connect_with_retry};
pub use sql::{SqlSession, SqlSessionProvider};
